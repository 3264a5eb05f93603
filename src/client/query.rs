//! Query-string helpers shared by the services.
//!
//! Query parameters are serialized with serde. Parameters whose value is
//! `None`, an empty string or an empty list are omitted entirely, so an
//! explicitly empty filter and an absent one look the same on the wire.

use std::borrow::Cow;

use serde::{Serialize, Serializer};

/// Percent-encode a single path segment (an id, slug or email).
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// `skip_serializing_if` predicate for optional strings.
pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// `skip_serializing_if` predicate for borrowed slices.
pub(crate) fn is_empty_slice<T>(value: &&[T]) -> bool {
    value.is_empty()
}

/// Serialize a list as a single comma-separated value (`expand=a,b`).
pub(crate) fn comma_separated<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<str>,
{
    let joined = items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",");
    serializer.serialize_str(&joined)
}

/// Query carrying only an `expand` list.
#[derive(Debug, Serialize)]
pub(crate) struct ExpandQuery<'a, E: AsRef<str>> {
    #[serde(
        skip_serializing_if = "is_empty_slice",
        serialize_with = "comma_separated"
    )]
    pub expand: &'a [E],
}

macro_rules! expand_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Wire name of this expansion.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}

expand_enum! {
    /// Optional fields that can be expanded on organizations.
    OrganizationExpand {
        /// Current balance
        BalanceCents => "balance_cents",
        /// Fee balance and totals
        Reporting => "reporting",
        /// Bank account and routing numbers
        AccountNumber => "account_number",
        /// Members with their roles
        Users => "users",
    }
}

expand_enum! {
    /// Optional fields that can be expanded on card grants.
    CardGrantExpand {
        /// Grant recipient
        User => "user",
        /// Owning organization
        Organization => "organization",
        /// Remaining balance
        BalanceCents => "balance_cents",
        /// Transfers funding the grant
        Disbursements => "disbursements",
    }
}

expand_enum! {
    /// Optional fields that can be expanded on Stripe cards.
    StripeCardExpand {
        /// Card holder
        User => "user",
        /// Owning organization
        Organization => "organization",
        /// Lifetime spend
        TotalSpentCents => "total_spent_cents",
        /// Spendable balance
        BalanceAvailable => "balance_available",
    }
}

expand_enum! {
    /// Optional fields that can be expanded on transactions.
    TransactionExpand {
        /// Owning organization
        Organization => "organization",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample<'a> {
        #[serde(skip_serializing_if = "is_blank")]
        search: Option<String>,
        #[serde(flatten)]
        expand: ExpandQuery<'a, OrganizationExpand>,
    }

    fn encode(sample: &Sample<'_>) -> String {
        let request = reqwest::Client::new()
            .get("http://x.test/")
            .query(sample)
            .build()
            .unwrap();
        request.url().query().unwrap_or_default().to_string()
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let sample = Sample {
            search: Some(String::new()),
            expand: ExpandQuery { expand: &[] },
        };
        assert_eq!(encode(&sample), "");
    }

    #[test]
    fn test_expand_is_comma_joined() {
        let sample = Sample {
            search: Some("coffee".into()),
            expand: ExpandQuery {
                expand: &[OrganizationExpand::BalanceCents, OrganizationExpand::Users],
            },
        };
        assert_eq!(encode(&sample), "search=coffee&expand=balance_cents%2Cusers");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("evt_123"), "evt_123");
        assert_eq!(segment("a+b@example.com"), "a%2Bb%40example.com");
    }
}
