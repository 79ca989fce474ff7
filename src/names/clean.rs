//! Cleaning of raw person names: honorifics, credentials, and comma forms.

/// Honorific prefixes stripped from the front of a name, lowercase.
const TITLE_PREFIXES: &[&str] = &["professor ", "prof.", "dr.-ing.", "dr ", "dr."];

/// Credential suffixes stripped from the end of a name, lowercase.
const CREDENTIAL_SUFFIXES: &[&str] = &[
    "(dr)", "(dr.)", ", m.d.", ", phd", ", md", ", mph", ", ph.d.", ", ms",
];

/// Credential tokens dropped when trailing a comma form, lowercase and
/// dot-free, as in "Smith, John, PhD".
const CREDENTIAL_TAILS: &[&str] = &[
    "phd", "md", "mph", "mba", "msc", "dmd", "facs", "pharmd", "frsc", "rn", "edd",
];

/// Cleaning reapplies itself until stable; the cap only guards against a
/// pathological input cycling between forms.
const MAX_CLEAN_PASSES: usize = 8;

/// Clean a raw person name: strip honorific prefixes and credential
/// suffixes, drop stray quotes and slashes, recase names written in a
/// single case, and reorder "Family, Given" comma forms.
///
/// The result is a fixed point: cleaning a cleaned name returns it
/// unchanged.
pub fn clean_name(name: &str) -> String {
    let mut current = name.trim().to_string();
    for _ in 0..MAX_CLEAN_PASSES {
        let next = clean_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_pass(name: &str) -> String {
    let mut name = name.trim().to_string();

    for prefix in TITLE_PREFIXES {
        if let Some(rest) = strip_prefix_ci(&name, prefix) {
            name = rest.trim().to_string();
        }
    }
    for suffix in CREDENTIAL_SUFFIXES {
        if let Some(rest) = strip_suffix_ci(&name, suffix) {
            name = rest.trim().to_string();
        }
    }

    name = name.replace('"', "");
    name = name
        .trim_matches('/')
        .trim_matches('\\')
        .trim()
        .to_string();

    // Fix names lazily written in all caps or all lowercase.
    if name == name.to_lowercase() || name == name.to_uppercase() {
        name = title_case(&name);
    }

    uncomma(&name)
}

/// Case-insensitive prefix strip. Patterns are ASCII, so a match never
/// lands inside a multi-byte character.
fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

fn strip_suffix_ci<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let start = text.len().checked_sub(suffix.len())?;
    let tail = text.get(start..)?;
    tail.eq_ignore_ascii_case(suffix).then(|| &text[..start])
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Reorder "Family, Given" into "Given Family".
///
/// A trailing credential token ("Smith, John, PhD") is dropped before
/// reordering. Generation suffixes and single initials ("Jr", "Q.") are
/// kept. Commas left at token ends after reordering are removed so the
/// output contains no comma forms to reprocess.
fn uncomma(name: &str) -> String {
    if !name.contains(',') {
        return name.to_string();
    }

    let tightened = name.replace(" ,", ",");
    let mut parts: Vec<String> = tightened.split_whitespace().map(str::to_string).collect();
    if parts.len() < 2 {
        return tightened;
    }

    if parts.len() > 2 && parts[parts.len() - 2].ends_with(',') {
        let tail = parts[parts.len() - 1].to_lowercase().replace('.', "");
        if CREDENTIAL_TAILS.contains(&tail.as_str()) {
            parts.pop();
            if let Some(last) = parts.last_mut() {
                *last = last.trim_end_matches(',').to_string();
            }
        }
    }

    if parts[0].ends_with(',') {
        let family = parts.remove(0).trim_end_matches(',').to_string();
        let mut reordered: Vec<String> = parts
            .into_iter()
            .map(|part| part.trim_end_matches(',').to_string())
            .collect();
        reordered.push(family);
        reordered.retain(|part| !part.is_empty());
        return reordered.join(" ");
    }

    parts.join(" ")
}
