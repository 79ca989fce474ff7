//! Standardization of organizational roles and academic degrees.
//!
//! Role text is first offered to an injected controlled vocabulary,
//! then matched against the built-in replacement table, then retried
//! with subject tails ("Professor of Chemistry") and degree phrasings
//! ("BSc in Chemistry") peeled off. Whatever survives unmatched is
//! carried through as raw text rather than dropped.

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::records::Role;

/// Labels shorter than this are treated as noise, not roles.
const MINIMUM_ROLE_LENGTH: usize = 4;

/// Leading qualifiers that never change what the role is.
const QUALIFIER_PREFIXES: &[&str] = &["Visiting ", "Junior ", "Senior "];

/// Canonical role labels and variant spellings mapping to them.
/// Variants are compared after [`norm_role`], so case, dots, spacing,
/// and hyphenation in the source spelling do not matter.
const ROLE_VARIANTS: &[(&str, &[&str])] = &[
    ("Diploma", &["High School Diploma", "High School"]),
    ("Intern", &["Internship", "intern", "Research Intern"]),
    ("Trainee", &["Trainee", "Estagiário", "Estagiária"]),
    ("Student", &["Estudiante", "студент", "Estudante"]),
    (
        "Professor",
        &[
            "professor",
            "Profesora",
            "Professora",
            "Profesor",
            "Full Professor",
            "Prof.",
            "Prof. Dr.",
            "Research Professor",
            "Profesor Investigador",
            "Profesor Titular de Universidad",
            "профессор",
            "Professor Emeritus",
            "Professeur",
            "Emeritus Professor",
        ],
    ),
    (
        "Postdoctoral Researcher",
        &[
            "Postdoctoral researcher",
            "postdoc",
            "postdoctoral research fellow",
            "Postdoctoral Research Associate",
            "Postdoctoral fellow",
            "Post-doc",
            "Postdoctoral Scholar",
            "Postdoctoral Associate",
            "Postgraduate",
            "Postdoctoral",
            "Postdoctor",
            "Postdoc Researcher",
            "Postdoc researcher",
            "Postdoc Fellow",
            "Postdoctoral Scientist",
            "Post Doctoral Fellowship",
            "Postdoctoral Fellowship",
            "Postdoctorate",
            "Postdoctoral fellowship",
            "Postdoctoral Research",
            "Posdoc",
            "Postdoctorado",
            "Postdoctoral research",
            "Pós-Doutorado",
            "Pós-doutorado",
            "Post Doctorat",
        ],
    ),
    ("Medical Resident", &["residency", "resident"]),
    ("Nurse", &["Enfermagem", "Enfermeira", "Enfermera"]),
    (
        "Researcher",
        &[
            "Research Fellow",
            "Research Scientist",
            "Senior Researcher",
            "Scientist",
            "Senior Research Fellow",
            "Senior Research Scientist",
            "Research Scholar",
            "Senior Scientist",
            "Senior Research Associate",
            "Visiting Researcher",
            "Junior Researcher",
            "Staff Scientist",
            "Principal Scientist",
            "Researcher (Academic)",
            "Assistant Researcher",
            "Ricercatori",
            "Research",
            "Research Specialist",
            "Wissenschaftlicher Mitarbeiter",
            "Scientific Researcher",
            "Graduate Student Researcher",
            "Biologist",
            "Biology",
        ],
    ),
    ("Department Head", &["Head of the Department"]),
    (
        "Assistant Professor",
        &[
            "Assistant professor",
            "Research Assistant Professor",
            "Profesor Asociado",
            "Asst. Professor",
            "Adjunct Assistant Professor",
        ],
    ),
    (
        "Associate Professor",
        &[
            "Associate professor",
            "Profesor Titular",
            "Associated Professor",
            "Assoc. Prof.",
            "Professor Associado",
        ],
    ),
    ("Adjunct Professor", &["Professor Adjunto", "Professora Adjunta"]),
    ("Teaching Assistant", &["Teaching Assistant", "Graduate Teaching Assistant"]),
    (
        "Research Assistant",
        &[
            "Research assistant",
            "Graduate Research Assistant",
            "Undergraduate Research Assistant",
        ],
    ),
    ("Research Associate", &["Research associate"]),
    ("Docent", &["доцент", "Docenti di ruolo di Ia fascia", "DOCENTE"]),
    (
        "Lecturer",
        &[
            "lecturer",
            "Instructor",
            "Mestre",
            "Teacher",
            "Lecture",
            "Senior lecturer",
            "Associate Lecturer",
            "старший преподаватель",
            "Adjunct Lecturer",
        ],
    ),
    ("Assistant Lecturer", &["Assistant Lecturer"]),
    ("Psychologist", &["Psicólogo", "Psicóloga", "Psicologia"]),
    ("Physiotherapist", &["Fisioterapeuta"]),
    ("Lawyer", &["Abogado", "Abogada"]),
    ("Software Developer", &["Software Developer", "Software Engineer"]),
    ("Specialist", &["Especialização", "Especialista", "специалист"]),
    (
        "Engineer",
        &[
            "Chemical Engineer",
            "Engineer",
            "Ingeniero Industrial",
            "Ing.",
            "Ingeniero Civil",
            "Ingeniero Agrónomo",
            "Mechanical Engineer",
            "Civil Engineer",
            "Ingeniero de Sistemas",
            "engineer",
            "Chemical Engineering",
            "Ingeniero Químico",
            "Engenheiro Agrônomo",
            "Engenharia Civil",
            "Mechanical Engineering",
            "Electrical Engineer",
            "Ingeniero Electrónico",
            "Ingeniero Mecánico",
            "Industrial Engineer",
            "Civil Engineering",
            "Computer Engineering",
            "Electronic Engineer",
        ],
    ),
];

lazy_static! {
    static ref ROLE_REPLACEMENTS: HashMap<String, &'static str> = {
        let mut map = HashMap::new();
        for (canonical, variants) in ROLE_VARIANTS {
            map.insert(norm_role(canonical), *canonical);
            for variant in *variants {
                map.insert(norm_role(variant), *canonical);
            }
        }
        map
    };
}

/// Normalize a role for table lookup: lowercase with separator
/// characters removed entirely.
fn norm_role(role: &str) -> String {
    role.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '.' | '_' | ' ' | '-' | '\'' | '’'))
        .collect()
}

/// External controlled vocabulary for roles and degrees.
pub trait RoleVocabulary: Send + Sync {
    /// Canonical label for `text`, if the vocabulary knows it.
    fn lookup(&self, text: &str) -> Option<String>;
}

/// Standardizes role text, preferring an injected controlled vocabulary
/// over the built-in replacement table.
#[derive(Clone, Default)]
pub struct RoleStandardizer {
    vocabulary: Option<Arc<dyn RoleVocabulary>>,
}

impl RoleStandardizer {
    pub fn new() -> Self {
        RoleStandardizer { vocabulary: None }
    }

    pub fn with_vocabulary(vocabulary: Arc<dyn RoleVocabulary>) -> Self {
        RoleStandardizer {
            vocabulary: Some(vocabulary),
        }
    }

    /// Standardize role text. Returns `None` when the text is empty or
    /// the resulting label is too short to be a role.
    pub fn standardize(&self, text: &str) -> Option<Role> {
        let mut role = text.trim().replace('\t', " ").replace("  ", " ");
        for prefix in QUALIFIER_PREFIXES {
            if let Some(rest) = role.strip_prefix(prefix) {
                role = rest.to_string();
            }
        }
        let role = role.trim();
        if role.is_empty() {
            return None;
        }

        let (label, standardized) = self.standardize_label(role);
        if label.chars().count() < MINIMUM_ROLE_LENGTH {
            return None;
        }
        Some(if standardized {
            Role::Standardized(label)
        } else {
            Role::Raw(label)
        })
    }

    fn standardize_label(&self, role: &str) -> (String, bool) {
        if let Some(label) = self.vocab_lookup(role) {
            return (label, true);
        }
        let norm = norm_role(role);
        if let Some(canonical) = ROLE_REPLACEMENTS.get(&norm) {
            return ((*canonical).to_string(), true);
        }

        // "Professor of Chemistry" carries the role in its head.
        for separator in [" in ", " of "] {
            let Some((head, _)) = role.split_once(separator) else {
                continue;
            };
            if let Some(label) = self.vocab_lookup(head) {
                return (label, true);
            }
            if let Some(canonical) = ROLE_REPLACEMENTS.get(&norm_role(head)) {
                return ((*canonical).to_string(), true);
            }
        }

        if let Some(degree) = degree_label(role, &norm) {
            return (degree.to_string(), true);
        }

        (role.to_string(), false)
    }

    fn vocab_lookup(&self, text: &str) -> Option<String> {
        self.vocabulary.as_ref()?.lookup(text)
    }
}

/// Degree phrases written as abbreviation + subject, standardized to the
/// spelled-out degree name.
fn degree_label(role: &str, norm: &str) -> Option<&'static str> {
    if norm.starts_with("bscin") {
        return Some("Bachelor of Science");
    }
    if norm.starts_with("mscin") {
        return Some("Master of Science");
    }
    if norm.starts_with("phdin") || norm.starts_with("phdstudentin") {
        return Some("Doctor of Philosophy");
    }
    // "MA" needs the spaced form: too many unrelated words start with "ma".
    if role.to_lowercase().replace('.', "").starts_with("ma in ") {
        return Some("Master of Arts");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standardize(text: &str) -> Option<Role> {
        RoleStandardizer::new().standardize(text)
    }

    #[test]
    fn test_replacement_table() {
        assert_eq!(
            standardize("Full Professor"),
            Some(Role::Standardized("Professor".to_string()))
        );
        assert_eq!(
            standardize("professor"),
            Some(Role::Standardized("Professor".to_string()))
        );
        assert_eq!(
            standardize("Post-doc"),
            Some(Role::Standardized("Postdoctoral Researcher".to_string()))
        );
        assert_eq!(
            standardize("студент"),
            Some(Role::Standardized("Student".to_string()))
        );
    }

    #[test]
    fn test_qualifier_prefixes_are_stripped() {
        assert_eq!(
            standardize("Visiting Researcher"),
            Some(Role::Standardized("Researcher".to_string()))
        );
        assert_eq!(
            standardize("Senior Software Engineer"),
            Some(Role::Standardized("Software Developer".to_string()))
        );
    }

    #[test]
    fn test_subject_tails_are_peeled() {
        assert_eq!(
            standardize("Professor of Chemistry"),
            Some(Role::Standardized("Professor".to_string()))
        );
        assert_eq!(
            standardize("Lecturer in Statistics"),
            Some(Role::Standardized("Lecturer".to_string()))
        );
    }

    #[test]
    fn test_degree_phrasings() {
        assert_eq!(
            standardize("BSc in Chemistry"),
            Some(Role::Standardized("Bachelor of Science".to_string()))
        );
        assert_eq!(
            standardize("M.Sc. in Physics"),
            Some(Role::Standardized("Master of Science".to_string()))
        );
        assert_eq!(
            standardize("MA in History"),
            Some(Role::Standardized("Master of Arts".to_string()))
        );
        assert_eq!(
            standardize("PhD in Biology"),
            Some(Role::Standardized("Doctor of Philosophy".to_string()))
        );
        assert_eq!(
            standardize("PhD student in Computational Biology"),
            Some(Role::Standardized("Doctor of Philosophy".to_string()))
        );
    }

    #[test]
    fn test_degree_abbreviations_do_not_overreach() {
        // Regression: "ma" must not swallow unrelated words.
        assert_eq!(
            standardize("Maintenance Engineer"),
            Some(Role::Raw("Maintenance Engineer".to_string()))
        );
        assert_eq!(
            standardize("Marine Biologist"),
            Some(Role::Raw("Marine Biologist".to_string()))
        );
    }

    #[test]
    fn test_unknown_roles_stay_raw() {
        let role = standardize("Chief Happiness Officer").unwrap();
        assert_eq!(role.label(), "Chief Happiness Officer");
        assert!(!role.is_standardized());
    }

    #[test]
    fn test_short_and_empty_labels_are_dropped() {
        assert_eq!(standardize("CEO"), None);
        assert_eq!(standardize(""), None);
        assert_eq!(standardize("   "), None);
        assert_eq!(standardize("Dean"), Some(Role::Raw("Dean".to_string())));
    }

    #[test]
    fn test_whitespace_cleanup() {
        assert_eq!(
            standardize("Full\tProfessor"),
            Some(Role::Standardized("Professor".to_string()))
        );
        assert_eq!(
            standardize("Research  Fellow"),
            Some(Role::Standardized("Researcher".to_string()))
        );
    }

    struct TestVocabulary;

    impl RoleVocabulary for TestVocabulary {
        fn lookup(&self, text: &str) -> Option<String> {
            (text.eq_ignore_ascii_case("principal investigator"))
                .then(|| "Principal Investigator".to_string())
        }
    }

    #[test]
    fn test_vocabulary_takes_precedence() {
        let standardizer = RoleStandardizer::with_vocabulary(Arc::new(TestVocabulary));
        assert_eq!(
            standardizer.standardize("principal investigator"),
            Some(Role::Standardized("Principal Investigator".to_string()))
        );
        assert_eq!(
            standardizer.standardize("Principal Investigator of the Lab"),
            Some(Role::Standardized("Principal Investigator".to_string()))
        );
        // The built-in table still backs up the vocabulary.
        assert_eq!(
            standardizer.standardize("Full Professor"),
            Some(Role::Standardized("Professor".to_string()))
        );
    }
}
