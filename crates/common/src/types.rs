use serde::{Deserialize, Serialize};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from its raw value.
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw value as sent over the wire.
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

record_id!(
    /// Identifier of an inventory item.
    InventoryId
);
record_id!(
    /// Identifier of a transaction record.
    TransactionId
);
record_id!(
    /// Identifier of a user (transaction owner).
    UserId
);
record_id!(
    /// Identifier of an inventory category.
    CategoryId
);
record_id!(
    /// Identifier of a weight/size classification.
    WeightId
);

/// The kind of a transaction and, through it, the direction of its stock effect.
///
/// ```text
/// expense  ──► stock in   (+quantity)
/// earning  ──► stock out  (-quantity)
/// capital  ──► no effect
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Replenishment purchased from a supplier.
    #[default]
    Expense,

    /// A sale; stock leaves the inventory.
    Earning,

    /// Purely financial movement.
    Capital,
}

impl TransactionType {
    /// Returns the type whose stock effect undoes this one.
    pub fn reversed(&self) -> Self {
        match self {
            TransactionType::Expense => TransactionType::Earning,
            TransactionType::Earning => TransactionType::Expense,
            TransactionType::Capital => TransactionType::Capital,
        }
    }

    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Expense => "expense",
            TransactionType::Earning => "earning",
            TransactionType::Capital => "capital",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "earning" => Ok(TransactionType::Earning),
            "capital" => Ok(TransactionType::Capital),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_bare_integers() {
        let id = InventoryId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let parsed: InventoryId = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn ids_parse_from_path_segments() {
        let id: TransactionId = " 7 ".parse().unwrap();
        assert_eq!(id.as_i64(), 7);
        assert!("abc".parse::<TransactionId>().is_err());
    }

    #[test]
    fn default_type_is_expense() {
        assert_eq!(TransactionType::default(), TransactionType::Expense);
    }

    #[test]
    fn reversed_swaps_stock_direction() {
        assert_eq!(TransactionType::Expense.reversed(), TransactionType::Earning);
        assert_eq!(TransactionType::Earning.reversed(), TransactionType::Expense);
        assert_eq!(TransactionType::Capital.reversed(), TransactionType::Capital);
    }

    #[test]
    fn wire_names_are_lowercase() {
        let json = serde_json::to_string(&TransactionType::Earning).unwrap();
        assert_eq!(json, "\"earning\"");
        let parsed: TransactionType = serde_json::from_str("\"capital\"").unwrap();
        assert_eq!(parsed, TransactionType::Capital);
        assert_eq!("Expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("refund".parse::<TransactionType>().is_err());
    }
}
