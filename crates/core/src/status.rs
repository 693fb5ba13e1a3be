//! Status enums mapping to SMALLSERIAL lookup tables.
//!
//! Heist lifecycle and member availability are separate closed sets backed
//! by separate tables (`heist_statuses`, `member_statuses`). Each variant's
//! discriminant matches the seed data order (1-based).

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// All variants in seed order.
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Look up a variant by its database status ID.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// The seed-data name, e.g. `IN_PROGRESS`.
            pub fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = crate::error::CoreError;

            fn try_from(id: StatusId) -> Result<Self, Self::Error> {
                $name::from_id(id).ok_or_else(|| {
                    crate::error::CoreError::Internal(format!(
                        "Unknown {} id {id}",
                        stringify!($name)
                    ))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_status_enum! {
    /// Heist lifecycle status.
    HeistStatus {
        Planning = 1 => "PLANNING",
        Ready = 2 => "READY",
        InProgress = 3 => "IN_PROGRESS",
        Finished = 4 => "FINISHED",
    }
}

define_status_enum! {
    /// Member availability status.
    MemberStatus {
        Available = 1 => "AVAILABLE",
        Retired = 2 => "RETIRED",
        Expired = 3 => "EXPIRED",
        Incarcerated = 4 => "INCARCERATED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heist_status_ids_match_seed_data() {
        assert_eq!(HeistStatus::Planning.id(), 1);
        assert_eq!(HeistStatus::Ready.id(), 2);
        assert_eq!(HeistStatus::InProgress.id(), 3);
        assert_eq!(HeistStatus::Finished.id(), 4);
    }

    #[test]
    fn member_status_ids_match_seed_data() {
        assert_eq!(MemberStatus::Available.id(), 1);
        assert_eq!(MemberStatus::Retired.id(), 2);
        assert_eq!(MemberStatus::Expired.id(), 3);
        assert_eq!(MemberStatus::Incarcerated.id(), 4);
    }

    #[test]
    fn from_id_round_trips_every_variant() {
        for status in HeistStatus::ALL {
            assert_eq!(HeistStatus::from_id(status.id()), Some(*status));
        }
        for status in MemberStatus::ALL {
            assert_eq!(MemberStatus::from_id(status.id()), Some(*status));
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert_eq!(HeistStatus::from_id(0), None);
        assert!(MemberStatus::try_from(9_i16).is_err());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&HeistStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        let parsed: MemberStatus = serde_json::from_str("\"RETIRED\"").unwrap();
        assert_eq!(parsed, MemberStatus::Retired);
        assert_eq!(HeistStatus::InProgress.to_string(), "IN_PROGRESS");
    }
}
