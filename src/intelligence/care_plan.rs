use chrono::{Days, NaiveDate};

use crate::knowledge::{CareScheduleRule, KnowledgeBase};
use crate::models::{PatientSnapshot, Species};

use super::helpers::resolve_species;
use super::risk::{is_senior, validate_patient};
use super::types::{CarePlan, CarePlanItem, EngineError};

/// Build the preventive-care schedule for a patient.
///
/// One item per schedule rule whose species filter, age bracket and life
/// stage match. The due date follows the last recorded event of the rule's
/// category, or the patient's creation date when nothing is on record.
pub fn plan_care(kb: &KnowledgeBase, patient: &PatientSnapshot) -> Result<CarePlan, EngineError> {
    validate_patient(patient)?;

    let (species, notes) = resolve_species(&patient.species);
    let age = patient.age_years();
    let senior = is_senior(kb, species, &patient.breed, age);

    let mut items = kb
        .care_schedule
        .iter()
        .filter(|rule| rule.species.applies_to(species) && rule.matches_age(age, senior))
        .map(|rule| plan_item(rule, species, patient))
        .collect::<Result<Vec<_>, _>>()?;

    items.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.action.cmp(&b.action))
    });

    tracing::debug!(
        species = %species,
        items = items.len(),
        overdue = items.iter().filter(|i| i.overdue).count(),
        senior,
        "Care plan built"
    );

    Ok(CarePlan { items, notes })
}

fn plan_item(
    rule: &CareScheduleRule,
    species: Species,
    patient: &PatientSnapshot,
) -> Result<CarePlanItem, EngineError> {
    let due_date = match patient.last_event(rule.category) {
        Some(last) => add_days(last, rule.interval_days)?,
        None => add_days(patient.created_on, rule.first_due_days)?,
    };
    Ok(CarePlanItem {
        action: rule.action.replace("{species}", species.as_str()),
        category: rule.category,
        due_date,
        rationale: rule.rationale.clone(),
        priority: rule.priority,
        overdue: due_date < patient.as_of,
    })
}

fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate, EngineError> {
    u64::try_from(days)
        .ok()
        .and_then(|days| date.checked_add_days(Days::new(days)))
        .ok_or_else(|| {
            EngineError::InvalidInput(format!("cannot schedule {days} days after {date}"))
        })
}
