//! Synonym expansion for person names.
//!
//! Variants cover the comma form, initialisms, and middle-name
//! abbreviations of a full name. The last whitespace-separated token is
//! taken as the family name; this is wrong for some naming conventions
//! but holds often enough to be useful for lexical matching.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

/// Generate name variants for `name`, in a fixed order.
///
/// The output never contains `name` itself and never contains
/// duplicates. A name with fewer than two tokens produces no variants.
pub fn name_to_synonyms(name: &str) -> Vec<String> {
    let tokens: Vec<&str> = name.split_whitespace().collect();
    let Some((&family, givens)) = tokens.split_last() else {
        return Vec::new();
    };
    if givens.is_empty() {
        return Vec::new();
    }

    let firsts: Vec<&str> = givens.iter().map(|given| initial(given)).collect();

    let mut variants: Vec<String> = Vec::with_capacity(28);
    variants.push(format!("{family}, {}", givens[0]));
    variants.push(format!("{family}, {}", givens.join(" ")));

    if givens.len() > 1 {
        let first_given = givens[0];
        let middles = &firsts[1..];
        let spaced = middles.join(" ");
        let dotted: Vec<String> = middles.iter().map(|i| format!("{i}.")).collect();
        let dotted_unspaced = dotted.concat();
        let dotted_spaced = dotted.join(" ");

        variants.push(format!("{family}, {first_given} {spaced}"));
        variants.push(format!("{family}, {first_given} {dotted_unspaced}"));
        variants.push(format!("{family}, {first_given} {dotted_spaced}"));
        variants.push(format!("{first_given} {spaced} {family}"));
        variants.push(format!("{first_given} {dotted_unspaced} {family}"));
        variants.push(format!("{first_given} {dotted_spaced} {family}"));
    }

    let unspaced = firsts.concat();
    let spaced = firsts.join(" ");
    let dotted: Vec<String> = firsts.iter().map(|i| format!("{i}.")).collect();
    let dotted_unspaced = dotted.concat();
    let dotted_spaced = dotted.join(" ");
    let lead = firsts[0];

    variants.push(format!("{lead} {family}"));
    variants.push(format!("{lead}. {family}"));
    variants.push(format!("{unspaced} {family}"));
    variants.push(format!("{spaced} {family}"));
    variants.push(format!("{dotted_unspaced} {family}"));
    variants.push(format!("{dotted_spaced} {family}"));
    variants.push(format!("{family} {unspaced}"));
    variants.push(format!("{family} {dotted_unspaced}"));
    variants.push(format!("{family} {spaced}"));
    variants.push(format!("{family} {dotted_spaced}"));
    variants.push(format!("{family}, {unspaced}"));
    variants.push(format!("{family}, {dotted_unspaced}"));
    variants.push(format!("{family}, {spaced}"));
    variants.push(format!("{family}, {dotted_spaced}"));
    variants.push(format!("{family} {lead}"));
    variants.push(format!("{family} {lead}."));
    variants.push(format!("{family}, {lead}."));
    variants.push(format!("{family}, {lead}"));

    let mut seen: HashSet<String> = HashSet::with_capacity(variants.len() + 1);
    seen.insert(name.to_string());
    variants.retain(|variant| seen.insert(variant.clone()));
    variants
}

/// First grapheme cluster of a token, for building initials.
fn initial(token: &str) -> &str {
    token.graphemes(true).next().unwrap_or(token)
}
