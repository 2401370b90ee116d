//! Column names shared by the case/death and vaccination tables.
//!
//! The observation key of both source tables is (`country`, `date`). Every
//! other name here is either a source measurement or a derived feature.

pub const COUNTRY: &str = "country";
pub const DATE: &str = "date";

// Case/death observations.
pub const TOTAL_CASES: &str = "total_cases";
pub const NEW_CASES: &str = "new_cases";
pub const TOTAL_DEATHS: &str = "total_deaths";
pub const NEW_DEATHS: &str = "new_deaths";
pub const TOTAL_CASES_PER_MILLION: &str = "total_cases_per_million";
pub const TOTAL_DEATHS_PER_MILLION: &str = "total_deaths_per_million";
pub const POPULATION: &str = "population";
pub const POPULATION_DENSITY: &str = "population_density";
pub const MEDIAN_AGE: &str = "median_age";
pub const GDP_PER_CAPITA: &str = "gdp_per_capita";
pub const HOSPITAL_BEDS_PER_THOUSAND: &str = "hospital_beds_per_thousand";
pub const LIFE_EXPECTANCY: &str = "life_expectancy";
pub const HUMAN_DEVELOPMENT_INDEX: &str = "human_development_index";

// Vaccination observations.
pub const TOTAL_VACCINATIONS: &str = "total_vaccinations";
pub const PEOPLE_VACCINATED: &str = "people_vaccinated";
pub const PEOPLE_FULLY_VACCINATED: &str = "people_fully_vaccinated";
pub const TOTAL_VACCINATIONS_PER_HUNDRED: &str = "total_vaccinations_per_hundred";
pub const PEOPLE_VACCINATED_PER_HUNDRED: &str = "people_vaccinated_per_hundred";
pub const PEOPLE_FULLY_VACCINATED_PER_HUNDRED: &str = "people_fully_vaccinated_per_hundred";

// Derived features.
pub const DEATH_RATE: &str = "death_rate";
pub const HEALTHCARE_CAPACITY_INDEX: &str = "healthcare_capacity_index";
pub const VACCINATION_SPEED: &str = "vaccination_speed";
pub const VACCINATION_EFFICIENCY: &str = "vaccination_efficiency";

/// Suffixes applied by the integrator to colliding non-key columns.
pub const COVID_SUFFIX: &str = "_covid";
pub const VACC_SUFFIX: &str = "_vacc";

/// Columns that identify an observation and are never imputed.
pub fn is_key_column(name: &str) -> bool {
    name == COUNTRY || name == DATE
}
