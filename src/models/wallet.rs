use serde::Deserialize;

/// The tenant's prepaid credit count.
#[derive(Clone, Debug, Deserialize)]
pub struct WalletBalance {
    pub credits: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_deserializes() {
        let balance: WalletBalance = serde_json::from_str(r#"{"credits":500}"#).unwrap();
        assert_eq!(balance.credits, 500);
    }
}
