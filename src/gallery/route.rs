use super::types::{Catalog, PageEntry};

/// Which view the location fragment selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Gallery,
    Detail(&'a PageEntry),
}

impl<'a> Route<'a> {
    /// Resolves `#bildanalyse/napoleon`-style fragments. Unknown paths show the gallery.
    pub fn parse(fragment: &str, catalog: &'a Catalog) -> Self {
        let path = fragment.trim().trim_start_matches('#');
        if path.is_empty() {
            return Route::Gallery;
        }
        catalog
            .find_by_path(path)
            .map(Route::Detail)
            .unwrap_or(Route::Gallery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fragment() {
        let catalog = Catalog::default();
        assert_eq!(Route::parse("", &catalog), Route::Gallery);
        assert_eq!(Route::parse("#", &catalog), Route::Gallery);
        assert_eq!(Route::parse("#bildanalyse/unbekannt", &catalog), Route::Gallery);
        match Route::parse("#bildanalyse/freiheit", &catalog) {
            Route::Detail(page) => assert_eq!(page.id, "freiheit-1830"),
            Route::Gallery => panic!("expected detail view"),
        }
        assert!(matches!(Route::parse("bildanalyse/napoleon", &catalog), Route::Detail(_)));
    }
}
