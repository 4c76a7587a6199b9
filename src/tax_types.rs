//! Human-readable labels for `Tax_Type` column codes.
//!
//! A code is `MEASURE_SECTOR_TARGETING`. Measure codes can themselves contain
//! `_` (`CIT_DP`), so codes are split from the right.

const MEASURES: &[(&str, &str)] = &[
    ("CITPITCIT", "Corporate income tax as a share of total tax paid"),
    ("CIT_DP", "Corporate income tax rate on distributed profit"),
    ("CPITCIT", "Combined personal and corporate income tax rate"),
    ("DP", "Distributed profit rate"),
    ("FWHT", "Final withholding tax rate"),
    ("GUD", "Grossed up dividend"),
    ("IDTC", "Imputation or dividend tax credit"),
    ("IR", "Imputation rate"),
    ("NPT", "Net personal tax"),
    ("PITGUD", "Personal income tax rate on grossed-up dividend"),
    ("PITPITCIT", "Personal income tax as a share of total tax paid"),
    ("PTDP", "Pre-tax distributed profit rate"),
];

const SECTORS: &[(&str, &str)] = &[("S13", "general government sector")];

const TARGETING: &[(&str, &str)] = &[("ST", "statutory rate")];

fn lookup(table: &[(&str, &'static str)], code: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}

fn measure_label(measure: &str) -> Option<&'static str> {
    lookup(MEASURES, measure)
}

/// Describes a `Tax_Type` code, echoing any part that is not a known code.
pub fn describe(code: &str) -> String {
    let mut parts = code.rsplitn(3, '_');
    let (Some(targeting), Some(sector), Some(measure)) = (parts.next(), parts.next(), parts.next())
    else {
        return code.to_string();
    };
    let measure = measure_label(measure).unwrap_or(measure);
    let sector = lookup(SECTORS, sector)
        .map(|label| format!("{label} ({sector})"))
        .unwrap_or_else(|| format!("sector {sector}"));
    let targeting = lookup(TARGETING, targeting)
        .map(|label| format!("{label} ({targeting})"))
        .unwrap_or_else(|| format!("targeting {targeting}"));
    format!("{measure}, {sector}, {targeting}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_known_codes() {
        assert_eq!(
            describe("DP_S13_ST"),
            "Distributed profit rate, general government sector (S13), statutory rate (ST)"
        );
    }

    #[test]
    fn measure_with_underscore_is_kept_whole() {
        assert!(describe("CIT_DP_S13_ST").starts_with("Corporate income tax rate on distributed"));
    }

    #[test]
    fn unknown_parts_are_echoed() {
        assert_eq!(describe("XYZ_S1_RED"), "XYZ, sector S1, targeting RED");
        assert_eq!(describe("plain"), "plain");
    }
}
