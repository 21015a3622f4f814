//! Field codes used by the SIVEP-Gripe extract layout.

pub const NOTIFICATION_DATE: &str = "DT_NOTIFIC";
pub const SYMPTOM_ONSET_DATE: &str = "DT_SIN_PRI";
pub const STATE: &str = "SG_UF";
pub const MUNICIPALITY: &str = "ID_MUNICIP";
pub const AGE: &str = "NU_IDADE_N";
pub const SEX: &str = "CS_SEXO";
pub const FEVER: &str = "FEBRE";
pub const COUGH: &str = "TOSSE";
pub const DYSPNEA: &str = "DISPNEIA";
pub const LOW_SATURATION: &str = "SATURACAO";
pub const HOSPITALIZED: &str = "HOSPITAL";
pub const HOSPITALIZATION_DATE: &str = "DT_INTERNA";
pub const ICU: &str = "UTI";
pub const ICU_ENTRY_DATE: &str = "DT_ENTUTI";
pub const VACCINATED: &str = "VACINA";
pub const FIRST_DOSE: &str = "DOSE_1_COV";
pub const SECOND_DOSE: &str = "DOSE_2_COV";
pub const BOOSTER_DOSE: &str = "DOSE_REF";
pub const OUTCOME: &str = "EVOLUCAO";
pub const OUTCOME_DATE: &str = "DT_EVOLUCA";

/// Dose fields counted into `vaccine_doses`.
pub const DOSES: [&str; 3] = [FIRST_DOSE, SECOND_DOSE, BOOSTER_DOSE];

