//! Closed sets of editor choices.
//!
//! Every choice field in the block schema is one of these enums. Each has a
//! default that applies when the stored value is missing or null, and a
//! stable string form used both in storage and in rendered CSS classes.

/// A closed set of string values with a default.
pub trait Choice: Sized + Copy + Default + 'static {
    /// `(value, label)` pairs in the order editors see them.
    const CHOICES: &'static [(&'static str, &'static str)];

    fn from_value(value: &str) -> Option<Self>;

    fn as_str(self) -> &'static str;

    /// Human readable label shown to editors.
    fn label(self) -> &'static str {
        let value = self.as_str();
        Self::CHOICES
            .iter()
            .find(|(v, _)| *v == value)
            .map(|(_, label)| *label)
            .unwrap_or(value)
    }

    /// Comma separated list of accepted values, for error messages.
    fn expected() -> String {
        Self::CHOICES
            .iter()
            .map(|(v, _)| format!("`{v}`"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Declares a [`Choice`] enum together with its serde impls.
macro_rules! choice {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => ($value:literal, $label:literal)),+ $(,)?
        }
        default $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $crate::blocks::choices::Choice for $name {
            const CHOICES: &'static [(&'static str, &'static str)] = &[$(($value, $label)),+];

            fn from_value(value: &str) -> Option<Self> {
                match value {
                    $($value => Some(Self::$variant),)+
                    _ => None,
                }
            }

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::blocks::choices::Choice::as_str(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::blocks::choices::Choice::as_str(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                <Self as $crate::blocks::choices::Choice>::from_value(&value).ok_or_else(|| {
                    ::serde::de::Error::custom(format!(
                        "unknown choice `{value}`, expected one of {}",
                        <Self as $crate::blocks::choices::Choice>::expected()
                    ))
                })
            }
        }
    };
}

pub(crate) use choice;

choice! {
    HeadingLevel {
        H2 => ("h2", "H2"),
        H3 => ("h3", "H3"),
        H4 => ("h4", "H4"),
    }
    default H2
}

choice! {
    ImageAlignment {
        Center => ("center", "Center"),
        Wide => ("wide", "Wide"),
        Full => ("full", "Full width"),
        Left => ("left", "Left (wrap)"),
        Right => ("right", "Right (wrap)"),
    }
    default Center
}

choice! {
    ImageStyle {
        Plain => ("plain", "Plain"),
        Card => ("card", "Card"),
        Soft => ("soft", "Soft panel"),
        Frame => ("frame", "Framed"),
    }
    default Plain
}

choice! {
    /// Caps the rendered width of an image.
    MaxWidth {
        Small => ("sm", "Small"),
        Medium => ("md", "Medium"),
        Large => ("lg", "Large"),
        ExtraLarge => ("xl", "Extra large"),
        Uncapped => ("none", "No cap"),
    }
    default Large
}

choice! {
    Radius {
        Square => ("none", "None"),
        Small => ("sm", "Small"),
        Medium => ("md", "Medium"),
        Large => ("lg", "Large"),
    }
    default Large
}

choice! {
    Shadow {
        Flat => ("none", "None"),
        Soft => ("sm", "Soft"),
        Medium => ("md", "Medium"),
    }
    default Soft
}

choice! {
    Aspect {
        Original => ("auto", "Original"),
        Widescreen => ("16x9", "16:9"),
        Classic => ("4x3", "4:3"),
        Square => ("1x1", "1:1"),
    }
    default Original
}

choice! {
    EmbedWidth {
        Small => ("sm", "Small"),
        Medium => ("md", "Medium"),
        Large => ("lg", "Large"),
        Full => ("full", "Full width"),
    }
    default Medium
}

choice! {
    EmbedAlign {
        Center => ("center", "Center"),
        Left => ("left", "Left"),
        Right => ("right", "Right"),
    }
    default Center
}

choice! {
    EmbedStyle {
        Plain => ("plain", "Plain"),
        Card => ("card", "Card"),
        Soft => ("soft", "Soft panel"),
    }
    default Card
}

choice! {
    CalloutStyle {
        Info => ("info", "Info"),
        Tip => ("tip", "Tip"),
        Warn => ("warn", "Warning"),
        Note => ("note", "Note"),
    }
    default Info
}

choice! {
    CodeLanguage {
        Python => ("python", "Python"),
        Bash => ("bash", "Bash"),
        Json => ("json", "JSON"),
        Yaml => ("yaml", "YAML"),
        Sql => ("sql", "SQL"),
        JavaScript => ("javascript", "JavaScript"),
        Html => ("html", "HTML"),
        Css => ("css", "CSS"),
        R => ("r", "R"),
        Text => ("text", "Plain text"),
    }
    default Text
}

choice! {
    ButtonVariant {
        Primary => ("primary", "Primary"),
        Outline => ("outline", "Outline"),
        Link => ("link", "Link"),
    }
    default Primary
}

choice! {
    SpacerSize {
        Small => ("sm", "Small"),
        Medium => ("md", "Medium"),
        Large => ("lg", "Large"),
    }
    default Medium
}

choice! {
    GalleryColumns {
        Two => ("2", "2 columns"),
        Three => ("3", "3 columns"),
    }
    default Two
}

choice! {
    SectionBackground {
        Plain => ("none", "None"),
        Soft => ("soft", "Soft"),
        Contrast => ("contrast", "Contrast"),
    }
    default Plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_editor_defaults() {
        assert_eq!(HeadingLevel::default(), HeadingLevel::H2);
        assert_eq!(CalloutStyle::default(), CalloutStyle::Info);
        assert_eq!(CodeLanguage::default(), CodeLanguage::Text);
        assert_eq!(SpacerSize::default(), SpacerSize::Medium);
        assert_eq!(MaxWidth::default().as_str(), "lg");
        assert_eq!(EmbedStyle::default().as_str(), "card");
    }

    #[test]
    fn values_round_trip_through_strings() {
        for (value, _) in Aspect::CHOICES {
            let choice = Aspect::from_value(value).unwrap();
            assert_eq!(choice.as_str(), *value);
        }
    }

    #[test]
    fn unknown_value_is_rejected() {
        assert_eq!(ButtonVariant::from_value("ghost"), None);
        assert_eq!(HeadingLevel::from_value("H2"), None);
    }

    #[test]
    fn labels_come_from_choice_table() {
        assert_eq!(CalloutStyle::Warn.label(), "Warning");
        assert_eq!(MaxWidth::Uncapped.label(), "No cap");
    }

    #[test]
    fn serde_uses_stored_value() {
        let json = serde_json::to_string(&GalleryColumns::Three).unwrap();
        assert_eq!(json, "\"3\"");

        let parsed: SectionBackground = serde_json::from_str("\"contrast\"").unwrap();
        assert_eq!(parsed, SectionBackground::Contrast);

        let err = serde_json::from_str::<SectionBackground>("\"loud\"").unwrap_err();
        assert!(err.to_string().contains("unknown choice `loud`"));
    }
}
