//! Logical dataset names exchanged with the catalog.

pub const COVID_RAW: &str = "covid_compact_raw";
pub const VACCINATION_RAW: &str = "vaccination_global_raw";

pub const COVID_VALIDATED: &str = "covid_compact_validated";
pub const VACCINATION_VALIDATED: &str = "vaccination_global_validated";
pub const QUALITY_REPORT: &str = "eda_summary_stats";

pub const COVID_SELECTED: &str = "covid_selected";
pub const VACC_SELECTED: &str = "vacc_selected";
pub const COVID_IMPUTED: &str = "covid_imputed";
pub const VACC_IMPUTED: &str = "vacc_imputed";
pub const COVID_FEATURES: &str = "covid_features";
pub const VACC_FEATURES: &str = "vacc_features";

pub const INTEGRATED: &str = "integrated_data";
pub const REGRESSION: &str = "regression_data";
pub const CLASSIFICATION: &str = "classification_data";

/// Display labels used in the quality report.
pub const COVID_LABEL: &str = "COVID-19";
pub const VACCINATION_LABEL: &str = "Vaccination";

/// Every dataset the default pipeline produces, in production order.
pub const PRODUCED: [&str; 12] = [
    COVID_VALIDATED,
    VACCINATION_VALIDATED,
    QUALITY_REPORT,
    COVID_SELECTED,
    VACC_SELECTED,
    COVID_IMPUTED,
    VACC_IMPUTED,
    COVID_FEATURES,
    VACC_FEATURES,
    INTEGRATED,
    REGRESSION,
    CLASSIFICATION,
];
