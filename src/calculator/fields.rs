//! Fixed mapping from the calculator's numbered output fields to names
//!
//! Field indices follow the TAXSIM output variable numbering.

/// Total federal Earned Income Credit
pub const FEDERAL_EITC_FIELD: u32 = 25;

/// State Earned Income Credit (CalEITC for California rows)
pub const STATE_EITC_FIELD: u32 = 39;

/// Federal Child Tax Credit (non-refundable portion)
pub const CTC_FIELD: u32 = 22;

/// Additional Child Tax Credit (refundable portion)
pub const ADDITIONAL_CTC_FIELD: u32 = 23;

/// Human-readable name for a known field index, for log messages
pub fn field_name(index: u32) -> Option<&'static str> {
    match index {
        FEDERAL_EITC_FIELD => Some("federal EITC"),
        STATE_EITC_FIELD => Some("state EITC"),
        CTC_FIELD => Some("child tax credit"),
        ADDITIONAL_CTC_FIELD => Some("additional child tax credit"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        assert_eq!(field_name(25), Some("federal EITC"));
        assert_eq!(field_name(39), Some("state EITC"));
        assert_eq!(field_name(99), None);
    }
}
