//! Collection naming: logical name → model/collection identifiers.
//!
//! The transform pair is pluggable configuration; the defaults mirror the
//! usual ODM convention of a pascal-case model name and a snake-case
//! collection name (e.g. `post_history` / `PostHistory`).

/// A pair of pure string transforms producing the model and collection
/// identifiers from a logical history name.
#[derive(Clone, Copy)]
pub struct NamingTransforms {
    pub model: fn(&str) -> String,
    pub collection: fn(&str) -> String,
}

impl Default for NamingTransforms {
    fn default() -> Self {
        Self {
            model: pascal_case,
            collection: snake_case,
        }
    }
}

impl std::fmt::Debug for NamingTransforms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamingTransforms").finish_non_exhaustive()
    }
}

/// The resolved identifiers for one history collection. Constructed once
/// at setup and held for the tracker's lifetime — no ambient registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionName {
    pub model: String,
    pub collection: String,
}

impl CollectionName {
    /// Resolves a logical name through the configured transforms.
    #[must_use]
    pub fn resolve(logical: &str, transforms: &NamingTransforms) -> Self {
        Self {
            model: (transforms.model)(logical),
            collection: (transforms.collection)(logical),
        }
    }
}

/// `post_history` / `post-history` / `postHistory` → `PostHistory`.
#[must_use]
pub fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = true;
    for ch in s.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `PostHistory` / `postHistory` → `post_history`.
#[must_use]
pub fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else if ch == '-' || ch == ' ' {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
