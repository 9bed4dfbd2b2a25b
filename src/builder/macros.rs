//! Macros for typed labels at the host boundary.

/// Declare an enum whose variants stand for string labels.
///
/// The generated type is `Copy`, implements `AsRef<str>` and `Display`, and
/// lists every variant in `ALL`. Because machines accept any `AsRef<str>`,
/// variants can be passed straight to
/// [`Machine::perform_transition`](crate::machine::Machine::perform_transition).
///
/// # Example
///
/// ```
/// use labelled_fsm::labels;
/// use labelled_fsm::core::Definition;
/// use labelled_fsm::machine::Machine;
///
/// labels! {
///     pub enum Turnstile {
///         Push => "push",
///         Coin => "coin",
///     }
/// }
///
/// let definition: Definition = "locked -> unlocked (coin); unlocked -> locked (push)"
///     .parse()
///     .unwrap();
/// let mut machine = Machine::new(&definition).unwrap();
///
/// machine.perform_transition(Turnstile::Coin).unwrap();
/// assert!(machine.is_in("unlocked"));
/// assert_eq!(Turnstile::ALL, &[Turnstile::Push, Turnstile::Coin]);
/// ```
#[macro_export]
macro_rules! labels {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string label this variant stands for.
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// The variant whose label is `label`, if any.
            pub fn from_label(label: &str) -> ::std::option::Option<Self> {
                match label {
                    $($label => ::std::option::Option::Some(Self::$variant),)+
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.label()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    labels! {
        enum KioskState {
            WaitingForCard => "waiting",
            WaitingForPin => "wait_for_pin",
            Purchased => "purchased",
        }
    }

    #[test]
    fn labels_macro_maps_variants() {
        assert_eq!(KioskState::WaitingForCard.label(), "waiting");
        assert_eq!(KioskState::WaitingForPin.as_ref(), "wait_for_pin");
        assert_eq!(KioskState::Purchased.to_string(), "purchased");
    }

    #[test]
    fn labels_macro_round_trips_labels() {
        for variant in KioskState::ALL {
            assert_eq!(KioskState::from_label(variant.label()), Some(*variant));
        }
        assert_eq!(KioskState::from_label("nowhere"), None);
    }

    #[test]
    fn labels_macro_supports_visibility() {
        labels! {
            pub enum PublicEvent {
                Go => "go",
            }
        }

        assert_eq!(PublicEvent::ALL.len(), 1);
    }
}
