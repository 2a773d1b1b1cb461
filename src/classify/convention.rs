//! Naming conventions
//!
//! Imported scenes carry no formal schema for "this is the backdrop" or "this
//! is the front of the card". Studios encode it in object and material names, so
//! the keywords live behind [`NamingConvention`] and the geometry and animation
//! stages never see a string literal.

/// Logical material targets for texture overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    /// Front faces of the subject
    Front,
    /// Back faces of the subject
    Back,
    /// Backdrop materials
    Background,
    /// Every subject material
    AllSubjects,
}

impl TextureTarget {
    /// Whether this target applies to background objects instead of subjects
    pub fn is_background(&self) -> bool {
        matches!(self, TextureTarget::Background)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextureTarget::Front => "front",
            TextureTarget::Back => "back",
            TextureTarget::Background => "background",
            TextureTarget::AllSubjects => "all subjects",
        }
    }
}

/// Classification rules for one asset naming convention
pub trait NamingConvention {
    /// Whether a material name marks its object as background
    fn is_background_material(&self, material_name: &str) -> bool;

    /// Whether an object name marks the object as background
    fn is_background_object(&self, object_name: &str) -> bool;

    /// Whether a material name belongs to the given texture target
    fn matches_target(&self, material_name: &str, target: TextureTarget) -> bool;
}

/// Keywords used by the studio asset pipeline
///
/// Material keywords match case-insensitively. ASCII keywords must be a whole
/// word of the name (split on separators, digits and camel case), so `back`
/// matches `Card_Back` and `CardBack` but not `Backdrop_mat`. CJK keywords match
/// anywhere. Object tokens are literal prefixes baked in by the export tooling
/// and match case-sensitively.
#[derive(Debug, Clone)]
pub struct StudioConvention {
    pub background_material_keywords: Vec<String>,
    pub background_object_tokens: Vec<String>,
    pub front_keywords: Vec<String>,
    pub back_keywords: Vec<String>,
}

impl Default for StudioConvention {
    fn default() -> Self {
        Self {
            background_material_keywords: vec!["背景".into(), "background".into()],
            background_object_tokens: vec!["VEN_".into(), "背景".into()],
            front_keywords: vec!["正面".into(), "front".into()],
            back_keywords: vec!["背面".into(), "back".into()],
        }
    }
}

/// Splits `name` into words at separators, letter/digit changes and
/// lower-to-upper case changes
fn words(name: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;

    for (i, c) in name.char_indices() {
        if !c.is_alphanumeric() {
            if let Some(s) = start.take() {
                words.push(&name[s..i]);
            }
            prev = None;
            continue;
        }
        let boundary = prev.is_some_and(|p| {
            (p.is_lowercase() && c.is_uppercase()) || (p.is_ascii_digit() != c.is_ascii_digit())
        });
        if boundary {
            if let Some(s) = start {
                words.push(&name[s..i]);
            }
            start = Some(i);
        } else if start.is_none() {
            start = Some(i);
        }
        prev = Some(c);
    }
    if let Some(s) = start {
        words.push(&name[s..]);
    }

    words
}

fn matches_any_keyword(name: &str, keywords: &[String]) -> bool {
    let words = words(name);
    let lower = name.to_lowercase();
    keywords.iter().any(|keyword| {
        if keyword.is_ascii() {
            words.iter().any(|word| word.eq_ignore_ascii_case(keyword))
        } else {
            lower.contains(&keyword.to_lowercase())
        }
    })
}

impl NamingConvention for StudioConvention {
    fn is_background_material(&self, material_name: &str) -> bool {
        matches_any_keyword(material_name, &self.background_material_keywords)
    }

    fn is_background_object(&self, object_name: &str) -> bool {
        self.background_object_tokens
            .iter()
            .any(|token| object_name.contains(token.as_str()))
    }

    fn matches_target(&self, material_name: &str, target: TextureTarget) -> bool {
        match target {
            TextureTarget::Front => matches_any_keyword(material_name, &self.front_keywords),
            TextureTarget::Back => matches_any_keyword(material_name, &self.back_keywords),
            TextureTarget::Background => self.is_background_material(material_name),
            TextureTarget::AllSubjects => true,
        }
    }
}
