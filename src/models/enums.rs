//! Choice enums stored in the lending tables

use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres,
};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Integer choices
// ---------------------------------------------------------------------------

/// Soft-delete flag carried by every record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum RecordStatus {
    #[default]
    Valid = 2,
    Invalid = -2,
}

impl RecordStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Valid => "Valid",
            RecordStatus::Invalid => "Invalid",
        }
    }
}

/// Payment state of a rent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum PayStatus {
    Failed = -2,
    #[default]
    Paying = 1,
    Success = 2,
}

impl PayStatus {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayStatus::Failed => "Failed",
            PayStatus::Paying => "Paying",
            PayStatus::Success => "Success",
        }
    }
}

/// Integer choices travel as their codes, in JSON and in query strings
macro_rules! int_choice_codes {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.code()
            }
        }

        impl TryFrom<i32> for $name {
            type Error = String;

            fn try_from(code: i32) -> Result<Self, Self::Error> {
                $(
                    if code == $name::$variant as i32 {
                        return Ok($name::$variant);
                    }
                )+
                Err(format!("unknown {} code: {}", stringify!($name), code))
            }
        }
    };
}

int_choice_codes!(RecordStatus { Valid, Invalid });
int_choice_codes!(PayStatus { Failed, Paying, Success });

// ---------------------------------------------------------------------------
// Text choices
// ---------------------------------------------------------------------------

/// Declares an enum persisted as its short text code (VARCHAR column).
macro_rules! text_choice {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => ($code:literal, $label:literal) ),+ $(,)?
        }
        default = $default:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
        pub enum $name {
            $(
                #[serde(rename = $code)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Code stored in the database
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code,)+
                }
            }

            /// Human readable label
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {} value: {}", stringify!($name), s)),
                }
            }
        }

        impl sqlx::Type<Postgres> for $name {
            fn type_info() -> PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }

            fn compatible(ty: &PgTypeInfo) -> bool {
                <String as sqlx::Type<Postgres>>::compatible(ty)
            }
        }

        impl<'r> Decode<'r, Postgres> for $name {
            fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
                let s = <&'r str as Decode<'r, Postgres>>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $name {
            fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
                <&str as Encode<Postgres>>::encode_by_ref(&self.as_str(), buf)
            }
        }
    };
}

text_choice! {
    /// Where a book (or the book of a checkout) currently is
    BookStatus {
        OnShelf => ("ON", "On Shelf"),
        CheckedOut => ("OUT", "Check Out"),
        Returned => ("RE", "Returned"),
        Lost => ("LO", "Lost"),
    }
    default = OnShelf
}

text_choice! {
    /// Reader sex
    Sex {
        Male => ("M", "Male"),
        Female => ("N", "Female"),
    }
    default = Male
}

text_choice! {
    /// How a checkout was initiated
    CheckOutType {
        ScanCode => ("SC", "Scan Code"),
        Shift => ("SH", "Shift"),
    }
    default = ScanCode
}

text_choice! {
    /// Progress of a transfer-of-custody request
    ShiftStatus {
        Requested => ("Req", "Requested"),
        Agreed => ("Arg", "Agreed"),
        Completed => ("Com", "Completed"),
        Aborted => ("Abr", "Abort"),
        Refused => ("Ref", "Refused"),
    }
    default = Requested
}

// ---------------------------------------------------------------------------
// Batch actions
// ---------------------------------------------------------------------------

/// Bulk status actions available on every admin list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BatchAction {
    Enable,
    Disable,
}

impl BatchAction {
    /// Status written by the action
    pub fn target_status(&self) -> RecordStatus {
        match self {
            BatchAction::Enable => RecordStatus::Valid,
            BatchAction::Disable => RecordStatus::Invalid,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BatchAction::Enable => "Mark selected records valid",
            BatchAction::Disable => "Mark selected records invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_codes() {
        assert_eq!(RecordStatus::default(), RecordStatus::Valid);
        assert_eq!(RecordStatus::Valid.code(), 2);
        assert_eq!(RecordStatus::Invalid.code(), -2);
    }

    #[test]
    fn test_pay_status_default() {
        assert_eq!(PayStatus::default(), PayStatus::Paying);
        assert_eq!(PayStatus::Paying.code(), 1);
        assert_eq!(PayStatus::Failed.code(), -2);
    }

    #[test]
    fn test_integer_choice_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&RecordStatus::Invalid).unwrap(), "-2");
        assert_eq!(serde_json::to_string(&PayStatus::Success).unwrap(), "2");
        assert_eq!(serde_json::from_str::<RecordStatus>("2").unwrap(), RecordStatus::Valid);
        assert_eq!(serde_json::from_str::<PayStatus>("-2").unwrap(), PayStatus::Failed);
        assert!(serde_json::from_str::<RecordStatus>("1").is_err());
        assert!(serde_json::from_str::<RecordStatus>("\"valid\"").is_err());
    }

    #[test]
    fn test_text_choice_codes() {
        assert_eq!(BookStatus::default().as_str(), "ON");
        assert_eq!("LO".parse::<BookStatus>(), Ok(BookStatus::Lost));
        assert!("lost".parse::<BookStatus>().is_err());
        assert_eq!(Sex::Female.as_str(), "N");
        assert_eq!(CheckOutType::default(), CheckOutType::ScanCode);
        assert_eq!(ShiftStatus::default().as_str(), "Req");
        assert_eq!(ShiftStatus::Aborted.label(), "Abort");
    }

    #[test]
    fn test_text_choice_serde_uses_codes() {
        let json = serde_json::to_string(&ShiftStatus::Refused).unwrap();
        assert_eq!(json, "\"Ref\"");
        let parsed: BookStatus = serde_json::from_str("\"OUT\"").unwrap();
        assert_eq!(parsed, BookStatus::CheckedOut);
    }

    #[test]
    fn test_every_code_round_trips() {
        for status in BookStatus::ALL {
            assert_eq!(status.as_str().parse::<BookStatus>().unwrap(), *status);
        }
        for status in ShiftStatus::ALL {
            assert_eq!(status.as_str().parse::<ShiftStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_batch_action_target() {
        assert_eq!(BatchAction::Enable.target_status(), RecordStatus::Valid);
        assert_eq!(BatchAction::Disable.target_status(), RecordStatus::Invalid);
        let action: BatchAction = serde_json::from_str("\"disable\"").unwrap();
        assert_eq!(action, BatchAction::Disable);
    }
}
