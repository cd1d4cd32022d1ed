use log::{info, warn};
use std::path::Path;

use super::types::{Catalog, PageEntry};

pub const DEFAULT_TITLE: &str = "Visual History";
pub const DEFAULT_SUBTITLE: &str = "Digitale Bildanalyse für den Geschichtsunterricht an der BoWi";

#[allow(clippy::too_many_arguments)]
fn page(
    id: &str,
    title: &str,
    subtitle: &str,
    path: &str,
    year: i32,
    tags: &[&str],
    focus_tag: &str,
    difficulty: u8,
    short_text: &str,
) -> PageEntry {
    PageEntry {
        id: id.to_string(),
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        description: title.to_string(),
        path: path.to_string(),
        image_url: format!("/assets/images/{}.jpg", id),
        thumb_url: None,
        year,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        focus_tag: focus_tag.to_string(),
        difficulty,
        short_text: short_text.to_string(),
        comparison_target: None,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog {
            title: DEFAULT_TITLE.to_string(),
            subtitle: DEFAULT_SUBTITLE.to_string(),
            pages: vec![
                page(
                    "napoleon-1801",
                    "Napoleon überquert die Alpen",
                    "Jacques-Louis David • 1801",
                    "bildanalyse/napoleon",
                    1801,
                    &["NEUZEIT", "FRANKREICH", "MACHTBILD"],
                    "MACHTBILD",
                    1,
                    "Napoleon als strahlender Held auf einem Pferd – Inszenierung oder Wahrheit?",
                ),
                page(
                    "freiheit-1830",
                    "Die Freiheit führt das Volk",
                    "Eugène Delacroix • 1830",
                    "bildanalyse/freiheit",
                    1830,
                    &["REVOLUTION", "19. JHD.", "FRANKREICH"],
                    "SYMBOLBILD",
                    2,
                    "Das berühmte Gemälde zur Julirevolution. Wer ist die Frau in der Mitte?",
                ),
            ],
        }
    }
}

impl Catalog {
    /// Pages sorted by year, narrowed to those whose title or a tag contains `query`
    pub fn displayed_pages(&self, query: &str) -> Vec<&PageEntry> {
        let mut pages: Vec<&PageEntry> = self.pages.iter().collect();
        pages.sort_by_key(|p| p.year);

        let q = query.trim().to_lowercase();
        if !q.is_empty() {
            pages.retain(|p| {
                p.title.to_lowercase().contains(&q) || p.tags.iter().any(|t| t.to_lowercase().contains(&q))
            });
        }
        pages
    }

    pub fn find_by_path(&self, path: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.path == path)
    }
}

/// Loads the gallery configuration. Any problem falls back to the built-in catalog.
pub fn load_catalog(path: Option<&Path>) -> Catalog {
    let Some(path) = path else {
        return Catalog::default();
    };

    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not read {} ({}), using built-in pages", path.display(), e);
            return Catalog::default();
        }
    };

    match serde_json::from_str::<Catalog>(&contents) {
        Ok(catalog) => {
            info!("Loaded {} pages from {}", catalog.pages.len(), path.display());
            catalog
        }
        Err(e) => {
            warn!("Ignoring malformed {} ({}), using built-in pages", path.display(), e);
            Catalog::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = Catalog::default();
        assert_eq!(catalog.title, "Visual History");
        assert_eq!(catalog.pages.len(), 2);
        assert_eq!(catalog.pages[0].image_url, "/assets/images/napoleon-1801.jpg");
    }

    #[test]
    fn test_displayed_pages_sorted_and_filtered() {
        let mut catalog = Catalog::default();
        catalog.pages.reverse();

        let all: Vec<_> = catalog.displayed_pages("  ").iter().map(|p| p.year).collect();
        assert_eq!(all, vec![1801, 1830]);

        let by_tag: Vec<_> = catalog.displayed_pages("revolution").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(by_tag, vec!["freiheit-1830"]);

        let by_title: Vec<_> = catalog.displayed_pages("ALPEN").iter().map(|p| p.id.as_str()).collect();
        assert_eq!(by_title, vec!["napoleon-1801"]);

        assert_eq!(catalog.displayed_pages("frankreich").len(), 2);
        assert!(catalog.displayed_pages("mittelalter").is_empty());
    }

    #[test]
    fn test_find_by_path() {
        let catalog = Catalog::default();
        assert_eq!(catalog.find_by_path("bildanalyse/freiheit").unwrap().year, 1830);
        assert!(catalog.find_by_path("bildanalyse").is_none());
    }

    #[test]
    fn test_load_catalog_falls_back() {
        assert_eq!(load_catalog(None), Catalog::default());

        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_catalog(Some(&dir.path().join("pages.json"))), Catalog::default());

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{\"title\": ").unwrap();
        assert_eq!(load_catalog(Some(&broken)), Catalog::default());
    }

    #[test]
    fn test_load_catalog_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pages.json");
        std::fs::write(
            &path,
            r#"{"title":"Bilder","subtitle":"Klasse 8","pages":[{
                "id":"mauer-1989","title":"Mauerfall","subtitle":"Foto • 1989",
                "description":"Mauerfall","path":"bildanalyse/mauer",
                "imageUrl":"/assets/images/mauer.jpg","year":1989,"tags":["DDR"],
                "focusTag":"FOTO","difficulty":3,"shortText":"Berlin im November.",
                "comparisonTarget":"freiheit-1830"}]}"#,
        )
        .unwrap();
        let catalog = load_catalog(Some(&path));
        assert_eq!(catalog.title, "Bilder");
        assert_eq!(catalog.pages[0].comparison_target.as_deref(), Some("freiheit-1830"));
        assert!(catalog.pages[0].thumb_url.is_none());
    }
}
