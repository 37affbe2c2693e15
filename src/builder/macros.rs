//! Macros for declaring event types.

/// Declare an event enum and derive its [`Event`](crate::core::Event) implementation.
///
/// Each variant's name is its event class. Variants may carry named fields.
///
/// # Example
///
/// ```
/// use statechart::event_enum;
/// use statechart::core::Event;
///
/// event_enum! {
///     pub enum FirstEvent {
///         Go { a: i32, b: char },
///         Kill { d: i16 },
///         Tick,
///     }
/// }
///
/// assert_eq!(FirstEvent::Go { a: 1, b: 'z' }.class(), "Go");
/// assert_eq!(FirstEvent::Tick.class(), "Tick");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $({ $($field:ident : $fty:ty),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant $({ $($field : $fty),* })?
            ),*
        }

        impl $crate::core::Event for $name {
            fn class(&self) -> &str {
                match self {
                    $(Self::$variant { .. } => stringify!($variant)),*
                }
            }
        }
    };
}
