// src/common/slug.rs

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Transforma um nome legível num identificador seguro para URL.
///
/// minúsculas → remove acentos (NFD) → troca qualquer sequência fora de
/// `[a-z0-9]` por um único hífen → remove hífens das pontas.
/// "Đ" não tem decomposição canônica, por isso vira "d" explicitamente.
pub fn derive_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    let folded = input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'đ' { 'd' } else { c });

    for c in folded {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
