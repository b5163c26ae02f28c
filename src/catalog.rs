//! Static catalog of the public site's sections
//!
//! The catalog is compiled in and immutable for the process lifetime; changing
//! it is a deployment-time change. Enumeration order doubles as the tie-break
//! order when two sections end up with the same effective position.
//!
//! The navigation bar is deliberately absent: the public renderer always
//! mounts it, regardless of visibility and ordering settings.

/// One named, independently visible and orderable block of the public site
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// Unique identifier, also the key used in the override documents
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,

    /// Visibility used when no override exists for this key
    pub default_visible: bool,

    /// Position used when no override exists for this key.
    /// Non-integer values slot a section between two integer positions
    /// without renumbering the others (photo gallery sits at 3.5).
    pub default_order: f64,
}

/// All known sections, in tie-break order
pub const SECTIONS: &[Section] = &[
    Section {
        key: "hero",
        name: "Hero",
        description: "Opening section with photo, headline and action buttons",
        icon: "\u{1F3E0}",
        default_visible: true,
        default_order: 0.0,
    },
    Section {
        key: "about",
        name: "About",
        description: "Background, credentials and experience",
        icon: "\u{1F464}",
        default_visible: true,
        default_order: 1.0,
    },
    Section {
        key: "services",
        name: "Services",
        description: "Offered services with prices and descriptions",
        icon: "\u{1F527}",
        default_visible: true,
        default_order: 2.0,
    },
    Section {
        key: "testimonials",
        name: "Testimonials",
        description: "Client testimonials and reviews",
        icon: "\u{1F4AC}",
        default_visible: true,
        default_order: 3.0,
    },
    Section {
        key: "photo-carousel",
        name: "Photo Gallery",
        description: "Carousel of office and ambience photos",
        icon: "\u{1F4F8}",
        default_visible: true,
        default_order: 3.5,
    },
    Section {
        key: "faq",
        name: "FAQ",
        description: "Frequently asked questions and answers",
        icon: "\u{2753}",
        default_visible: true,
        default_order: 4.0,
    },
    Section {
        key: "inspirational",
        name: "Inspirational Quote",
        description: "Motivational quote and its author",
        icon: "\u{1F4AD}",
        default_visible: true,
        default_order: 5.0,
    },
    Section {
        key: "contact",
        name: "Contact",
        description: "Contact information and form",
        icon: "\u{1F4DE}",
        default_visible: true,
        default_order: 6.0,
    },
];

/// Look up a catalog entry by key
pub fn get(key: &str) -> Option<&'static Section> {
    SECTIONS.iter().find(|s| s.key == key)
}

/// Whether `key` names a known section
pub fn contains(key: &str) -> bool {
    get(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        for (i, section) in SECTIONS.iter().enumerate() {
            assert!(
                !SECTIONS[i + 1..].iter().any(|other| other.key == section.key),
                "duplicate catalog key: {}",
                section.key
            );
        }
    }

    #[test]
    fn test_lookup_known_key() {
        let section = get("faq").unwrap();
        assert_eq!(section.name, "FAQ");
        assert!(section.default_visible);
    }

    #[test]
    fn test_lookup_unknown_key() {
        assert!(get("navigation").is_none());
        assert!(!contains("navigation"));
    }

    #[test]
    fn test_photo_carousel_seeded_between_integers() {
        // Fractional seed slots the gallery between testimonials (3) and faq (4)
        let gallery = get("photo-carousel").unwrap();
        assert_eq!(gallery.default_order, 3.5);
    }
}
