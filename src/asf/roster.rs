use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((.*?)\)").expect("class pattern is valid"));

/// Class or group written in parentheses after a name, e.g. "7.1" in "Sara (7.1)"
pub fn class_token(student: &str) -> &str {
    CLASS_RE
        .captures(student)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("")
}

/// Case-insensitive key that files umlauts and accented letters under their base letter
fn collation_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' => key.push('a'),
            'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' => key.push('o'),
            'ü' | 'ù' | 'ú' | 'û' => key.push('u'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ç' | 'ć' | 'č' => key.push('c'),
            'ñ' | 'ń' => key.push('n'),
            'š' | 'ś' | 'ş' => key.push('s'),
            'ž' | 'ź' | 'ż' => key.push('z'),
            'ğ' => key.push('g'),
            'ı' => key.push('i'),
            'ß' => key.push_str("ss"),
            other => key.push(other),
        }
    }
    key
}

/// Sorts a roster by class token, then by full name. Unannotated names come first.
/// Comparison ignores case and diacritics; the raw name only breaks ties.
pub fn sort_roster(students: &[String]) -> Vec<&str> {
    let mut sorted: Vec<&str> = students.iter().map(String::as_str).collect();
    sorted.sort_by_cached_key(|name| (collation_key(class_token(name)), collation_key(name), *name));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_token() {
        assert_eq!(class_token("Sara (7.1)"), "7.1");
        assert_eq!(class_token("Lina (5a) (AG)"), "5a");
        assert_eq!(class_token("Noah"), "");
        assert_eq!(class_token("Emma ()"), "");
    }

    #[test]
    fn test_sort_roster_groups_by_class() {
        let students: Vec<String> = ["Jonas (7.2)", "Sara (7.1)", "Ben (7.1)", "Gast", "Max (5.1)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            sort_roster(&students),
            vec!["Gast", "Max (5.1)", "Ben (7.1)", "Sara (7.1)", "Jonas (7.2)"]
        );
        // input order untouched
        assert_eq!(students[0], "Jonas (7.2)");
    }

    #[test]
    fn test_sort_roster_folds_umlauts_and_case() {
        let students: Vec<String> = ["Zoe (5a)", "Ömer (5a)", "paul (5a)", "Anna (5A)", "Özlem (5a)", "Ali (5a)"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            sort_roster(&students),
            vec!["Ali (5a)", "Anna (5A)", "Ömer (5a)", "Özlem (5a)", "paul (5a)", "Zoe (5a)"]
        );
        assert_eq!(collation_key("Straße Ü"), "strasse u");
    }
}
