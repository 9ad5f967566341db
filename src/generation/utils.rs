//! Identifier transformation utilities
//!
//! The generation pipeline derives interface, operation and type names from
//! free-form document text; these helpers turn that text into identifiers.

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Lower-cased words of `s`.
///
/// Words break on `-`, `_`, space, `.` and `/`, and where an upper-case
/// letter follows a lower-case letter or digit. Other punctuation is dropped.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut after_lower = false;

    for ch in s.chars() {
        if ch.is_alphanumeric() {
            if ch.is_uppercase() && after_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            after_lower = ch.is_lowercase() || ch.is_ascii_digit();
            current.extend(ch.to_lowercase());
        } else if matches!(ch, '-' | '_' | ' ' | '.' | '/') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            after_lower = false;
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// snake_case form of camelCase, PascalCase, kebab-case or spaced text.
///
/// ```
/// use bindsmith::generation::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("findPetsByStatus"), "find_pets_by_status");
/// assert_eq!(to_snake_case("find-pets-by-status"), "find_pets_by_status");
/// assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
/// ```
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// PascalCase form of `s`, built from the same words as [`to_snake_case`].
///
/// ```
/// use bindsmith::generation::utils::to_proper_case;
///
/// assert_eq!(to_proper_case("find_pets_by_status"), "FindPetsByStatus");
/// assert_eq!(to_proper_case("Swagger Petstore"), "SwaggerPetstore");
/// ```
pub fn to_proper_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Strips characters that cannot appear in an identifier.
///
/// Case is preserved; a character following a removed run is upper-cased so
/// word boundaries survive (`get-pet` becomes `getPet`). A leading digit is
/// prefixed with an underscore.
///
/// # Examples
/// ```
/// use bindsmith::generation::utils::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("getItem"), "getItem");
/// assert_eq!(sanitize_identifier("get-pet by id"), "getPetById");
/// assert_eq!(sanitize_identifier("2fa"), "_2fa");
/// assert_eq!(sanitize_identifier("{}"), "");
/// ```
pub fn sanitize_identifier(s: &str) -> String {
    let mut result = String::new();
    let mut capitalize_next = false;

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if capitalize_next && !result.is_empty() {
                result.push(ch.to_ascii_uppercase());
            } else {
                result.push(ch);
            }
            capitalize_next = false;
        } else {
            capitalize_next = true;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// PascalCase type name for a schema identifier or tag, always a valid identifier
pub fn to_type_name(s: &str) -> String {
    sanitize_identifier(&to_proper_case(s))
}

/// Snake-case field or argument name; keywords get a trailing underscore.
///
/// ```
/// use bindsmith::generation::utils::sanitize_rust_field_name;
///
/// assert_eq!(sanitize_rust_field_name("type"), "type_");
/// assert_eq!(sanitize_rust_field_name("firstName"), "first_name");
/// ```
pub fn sanitize_rust_field_name(s: &str) -> String {
    let name = sanitize_identifier(&to_snake_case(s));
    if name.is_empty() {
        "value".to_string()
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}
