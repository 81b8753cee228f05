// src/process/normalize.rs

/// Known sector-label variants and their canonical form.
///
/// Keys are stored as they look *after* [`normalize_sector`], so the usual
/// normalize-then-canonicalize composition maps each variant onto its
/// canonical label. `Tecinformacao` is the normalized form of the source
/// system's abbreviated `Tec.Informacao`.
pub static SECTOR_CANONICAL: &[(&str, &str)] = &[
    ("Bens Indls", "Bens Industriais"),
    ("Cons N Basico", "Consumo Não Básico"),
    ("Cons N Ciclico", "Consumo Não Cíclico"),
    ("Financ E Outros", "Financeiro e Outros"),
    ("Mats Basicos", "Materiais Básicos"),
    ("Petroleo/ Gas E Biocombustiveis", "Petróleo e Gás"),
    ("Saude/Comercio Distr", "Saúde"),
    ("Tecinformacao", "Tecnologia da Informação"),
    ("Tecnologia Da Informacao", "Tecnologia da Informação"),
    ("Utilidade Publ", "Utilidades Públicas"),
];

/// The built-in canonical map as owned pairs, for use in a pipeline config.
pub fn default_sector_map() -> Vec<(String, String)> {
    SECTOR_CANONICAL
        .iter()
        .map(|(variant, canonical)| (variant.to_string(), canonical.to_string()))
        .collect()
}

/// Map accented Latin letters onto their ASCII base letter. Anything not in
/// the table passes through untouched.
fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        _ => c,
    }
}

/// Title-case with word boundaries at spaces and `/`: the first letter of a
/// word is uppercased, every following letter lowercased. Non-letters pass
/// through without opening or closing a word.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut word_start = true;
    for c in input.chars() {
        if c == ' ' || c == '/' {
            word_start = true;
            out.push(c);
        } else if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Normalize a raw sector label: fold diacritics, title-case, then keep only
/// ASCII letters, digits, spaces and `/`.
///
/// The output alphabet is a fixpoint of all three steps, so normalizing an
/// already-normalized label is a no-op.
pub fn normalize_sector(raw: &str) -> String {
    let folded: String = raw.chars().map(fold_char).collect();
    title_case(&folded)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '/')
        .collect()
}

/// Apply the canonical map to a normalized label.
///
/// Each variant is replaced wherever it occurs as a substring, in map order —
/// kept bug-for-bug compatible with the source system, which applies the map
/// as a regex replace rather than a whole-field lookup. A label that merely
/// embeds a variant as infix is therefore rewritten too; whether that is
/// desired is an open question for the system owner. Labels no variant
/// matches pass through unchanged.
pub fn canonicalize_sector(normalized: &str, map: &[(String, String)]) -> String {
    let mut label = normalized.to_string();
    for (variant, canonical) in map {
        if label.contains(variant.as_str()) {
            label = label.replace(variant.as_str(), canonical);
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_and_title_cases() {
        assert_eq!(normalize_sector("Petróleo/ Gás e Biocombustíveis"), "Petroleo/ Gas E Biocombustiveis");
        assert_eq!(normalize_sector("tecnologia da informação"), "Tecnologia Da Informacao");
        assert_eq!(normalize_sector("SAÚDE/COMÉRCIO DISTR"), "Saude/Comercio Distr");
    }

    #[test]
    fn drops_characters_outside_the_allowed_set() {
        assert_eq!(normalize_sector("Tec.Informacao"), "Tecinformacao");
        assert_eq!(normalize_sector("Bens, Indls!"), "Bens Indls");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "Petróleo/ Gás e Biocombustíveis",
            "Tec.Informacao",
            "bens indls",
            "CONS N CÍCLICO",
            "Saúde/Comércio Distr",
            "Utilidade Publ",
            "já normal / sem acento 123",
        ];
        for raw in samples {
            let once = normalize_sector(raw);
            assert_eq!(normalize_sector(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn every_map_key_canonicalizes_to_its_value() {
        let map = default_sector_map();
        for (variant, canonical) in SECTOR_CANONICAL {
            let resolved = canonicalize_sector(&normalize_sector(variant), &map);
            assert_eq!(&resolved, canonical, "for variant {variant:?}");
        }
    }

    #[test]
    fn unmapped_labels_pass_through() {
        let map = default_sector_map();
        assert_eq!(canonicalize_sector("Energia Eletrica", &map), "Energia Eletrica");
    }

    #[test]
    fn substring_occurrences_are_replaced() {
        // Documented compatibility behavior: the variant matches as infix.
        let map = default_sector_map();
        assert_eq!(
            canonicalize_sector("Setor Bens Indls Xp", &map),
            "Setor Bens Industriais Xp"
        );
    }
}
