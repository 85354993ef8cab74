//! Compiled-in reference tables.

use crate::models::{CareCategory, CarePriority, Species, VitalMetric, VitalRange};

use super::{
    Aggravator, CareScheduleRule, ChronicConditionRule, ConditionTests, EscalationKeyword,
    KnowledgeBase, LabTest, LifeStage, SeniorThreshold, SpeciesScope, SymptomPattern, WeightBand,
};

use crate::models::Species::{Bird, Cat, Dog, Other, Rabbit};

pub(super) fn tables() -> KnowledgeBase {
    KnowledgeBase {
        symptom_patterns: symptom_patterns(),
        emergency_keywords: strings(&[
            "difficulty breathing",
            "not breathing",
            "seizure",
            "bleeding",
            "unconscious",
            "collapse",
            "collapsed",
            "bloated abdomen",
            "unable to urinate",
            "severe pain",
            "hit by car",
            "poisoning",
            "blue gums",
        ]),
        condition_tests: condition_tests(),
        vital_ranges: vital_ranges(),
        senior_thresholds: senior_thresholds(),
        weight_bands: weight_bands(),
        chronic_conditions: chronic_conditions(),
        escalation_keywords: vec![
            escalation("improving", 1),
            escalation("resolved", 1),
            escalation("stable", 2),
            escalation("controlled", 2),
            escalation("mild", 3),
            escalation("moderate", 4),
            escalation("worsening", 5),
            escalation("progressing", 5),
            escalation("severe", 6),
            escalation("uncontrolled", 6),
            escalation("critical", 7),
            escalation("end stage", 7),
        ],
        care_schedule: care_schedule(),
        lab_tests: lab_tests(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pattern(
    condition_name: &str,
    species: SpeciesScope,
    keywords: &[&str],
    base_confidence: f64,
    emergency: bool,
) -> SymptomPattern {
    SymptomPattern {
        condition_name: condition_name.into(),
        species,
        keywords: strings(keywords),
        base_confidence,
        emergency,
    }
}

fn symptom_patterns() -> Vec<SymptomPattern> {
    let any = || SpeciesScope::Any;
    let only = SpeciesScope::only;
    vec![
        // Gastrointestinal
        pattern("Gastroenteritis", only(&[Dog, Cat]), &["vomiting", "diarrhea", "not eating", "lethargy"], 0.85, false),
        pattern("Pancreatitis", only(&[Dog]), &["vomiting", "abdominal pain", "not eating", "lethargy", "diarrhea"], 0.7, false),
        pattern("Canine Parvovirus", only(&[Dog]), &["vomiting", "bloody diarrhea", "lethargy", "not eating", "fever"], 0.8, false),
        pattern("Dietary Indiscretion", only(&[Dog]), &["vomiting", "diarrhea"], 0.6, false),
        pattern("Gastric Dilatation-Volvulus", only(&[Dog]), &["bloated abdomen", "unproductive retching", "distended abdomen"], 0.9, true),
        pattern("Gastrointestinal Upset", any(), &["vomiting", "diarrhea", "loss of appetite", "not eating"], 0.7, false),
        pattern("Gastrointestinal Stasis", only(&[Rabbit]), &["not eating", "no droppings", "small droppings", "bloated abdomen", "lethargy"], 0.85, false),
        // Respiratory
        pattern("Kennel Cough", only(&[Dog]), &["coughing", "honking cough", "nasal discharge", "sneezing"], 0.75, false),
        pattern("Respiratory Distress", only(&[Cat, Dog, Rabbit]), &["difficulty breathing", "open mouth breathing", "collapse", "blue gums"], 0.9, true),
        pattern("Feline Asthma", only(&[Cat]), &["coughing", "wheezing", "difficulty breathing"], 0.75, false),
        pattern("Upper Respiratory Infection", only(&[Cat]), &["sneezing", "nasal discharge", "eye discharge", "fever", "not eating"], 0.75, false),
        pattern("Snuffles (Pasteurellosis)", only(&[Rabbit]), &["sneezing", "nasal discharge", "eye discharge", "head tilt"], 0.7, false),
        pattern("Avian Respiratory Infection", only(&[Bird]), &["tail bobbing", "wheezing", "sneezing", "nasal discharge"], 0.7, false),
        pattern("Respiratory Infection", any(), &["coughing", "sneezing", "nasal discharge", "wheezing", "difficulty breathing"], 0.65, false),
        // Urinary and endocrine
        pattern("Urethral Obstruction", only(&[Cat]), &["unable to urinate", "straining to urinate", "crying in litter box"], 0.9, true),
        pattern("Lower Urinary Tract Disease", only(&[Cat]), &["frequent urination", "blood in urine", "urinating outside litter box", "straining to urinate"], 0.7, false),
        pattern("Diabetes Mellitus", only(&[Dog, Cat]), &["excessive thirst", "frequent urination", "weight loss", "increased appetite"], 0.8, false),
        pattern("Chronic Kidney Disease", only(&[Dog, Cat]), &["excessive thirst", "frequent urination", "weight loss", "not eating", "bad breath"], 0.7, false),
        pattern("Hyperthyroidism", only(&[Cat]), &["weight loss", "increased appetite", "hyperactivity", "vomiting"], 0.7, false),
        // Skin and ears
        pattern("Allergic Dermatitis", any(), &["scratching", "itching", "hair loss", "red skin", "dry skin"], 0.7, false),
        pattern("Otitis Externa", only(&[Dog, Cat]), &["ear scratching", "head shaking", "ear odor", "ear discharge"], 0.75, false),
        pattern("Feather Plucking Disorder", only(&[Bird]), &["feather plucking", "bald patches", "skin picking"], 0.75, false),
        pattern("Flystrike", only(&[Rabbit]), &["maggots", "fly eggs on fur"], 0.9, true),
        // Musculoskeletal
        pattern("Osteoarthritis", only(&[Dog, Cat]), &["limping", "stiffness", "reluctance to jump", "difficulty rising"], 0.65, false),
        pattern("Hip Dysplasia", only(&[Dog]), &["limping", "bunny hopping", "difficulty rising", "hind limb weakness"], 0.6, false),
        pattern("Musculoskeletal Problem", any(), &["limping", "pain", "stiffness", "reduced mobility"], 0.55, false),
        // Dental
        pattern("Dental Disease", only(&[Dog, Cat]), &["bad breath", "drooling", "difficulty chewing", "pawing at mouth"], 0.7, false),
        pattern("Dental Malocclusion", only(&[Rabbit]), &["drooling", "difficulty chewing", "weight loss", "overgrown teeth"], 0.75, false),
        // Neurological, toxic, trauma
        pattern("Epileptic Seizure", only(&[Dog, Cat]), &["seizure", "convulsions", "unconscious"], 0.85, true),
        pattern("Toxin Ingestion", any(), &["poisoning", "ate chocolate", "ate rat poison", "toxin exposure"], 0.8, true),
        pattern("Trauma", any(), &["hit by car", "bleeding", "fracture"], 0.8, true),
        // Avian
        pattern("Psittacosis", only(&[Bird]), &["fluffed feathers", "nasal discharge", "lethargy", "green droppings"], 0.7, false),
        pattern("Egg Binding", only(&[Bird]), &["straining to lay", "sitting on cage floor", "egg bound"], 0.85, true),
    ]
}

fn tests(condition_name: &str, tests: &[&str]) -> ConditionTests {
    ConditionTests {
        condition_name: condition_name.into(),
        tests: strings(tests),
    }
}

fn condition_tests() -> Vec<ConditionTests> {
    const CBC: &str = "Complete Blood Count (CBC)";
    const CHEM: &str = "Blood Chemistry Panel";
    const FECAL: &str = "Fecal Examination";
    const XRAY_CHEST: &str = "Chest X-Ray";
    const XRAY_ABD: &str = "Abdominal X-Ray";
    const URINALYSIS: &str = "Urinalysis";
    vec![
        tests("Gastroenteritis", &[CBC, CHEM, FECAL]),
        tests("Pancreatitis", &[CBC, CHEM, "Pancreatic Lipase Immunoreactivity (cPLI)", "Abdominal Ultrasound"]),
        tests("Canine Parvovirus", &[CBC, "Parvovirus Fecal ELISA"]),
        tests("Dietary Indiscretion", &[FECAL, XRAY_ABD]),
        tests("Gastric Dilatation-Volvulus", &[XRAY_ABD, CHEM, "Blood Lactate"]),
        tests("Gastrointestinal Upset", &[FECAL, CHEM]),
        tests("Gastrointestinal Stasis", &[XRAY_ABD, CHEM]),
        tests("Kennel Cough", &[XRAY_CHEST, "Respiratory PCR Panel"]),
        tests("Respiratory Distress", &[XRAY_CHEST, "Pulse Oximetry", "Blood Gas Analysis"]),
        tests("Feline Asthma", &[XRAY_CHEST, "Bronchoalveolar Lavage"]),
        tests("Upper Respiratory Infection", &["Respiratory PCR Panel", "Physical Examination"]),
        tests("Snuffles (Pasteurellosis)", &["Nasal Swab Culture", XRAY_CHEST]),
        tests("Avian Respiratory Infection", &["Choanal Swab Culture", "Whole-Body Radiograph"]),
        tests("Respiratory Infection", &[XRAY_CHEST, "Respiratory Panel"]),
        tests("Urethral Obstruction", &[URINALYSIS, CHEM, "Electrolyte Panel"]),
        tests("Lower Urinary Tract Disease", &[URINALYSIS, "Urine Culture", "Bladder Ultrasound"]),
        tests("Diabetes Mellitus", &[CHEM, URINALYSIS, "Fructosamine Test"]),
        tests("Chronic Kidney Disease", &[CHEM, URINALYSIS, "SDMA Kidney Function Test", "Blood Pressure Measurement"]),
        tests("Hyperthyroidism", &["Total T4", CHEM]),
        tests("Allergic Dermatitis", &["Skin Scraping", "Skin Cytology"]),
        tests("Otitis Externa", &["Ear Cytology", "Otoscopic Examination"]),
        tests("Feather Plucking Disorder", &[CBC, "Skin Biopsy"]),
        tests("Flystrike", &["Wound Assessment", CBC]),
        tests("Osteoarthritis", &["Joint X-Ray", "Orthopedic Examination"]),
        tests("Hip Dysplasia", &["Hip X-Ray (PennHIP/OFA)", "Orthopedic Examination"]),
        tests("Musculoskeletal Problem", &["Orthopedic Examination", "Limb X-Ray"]),
        tests("Dental Disease", &["Oral Examination Under Anesthesia", "Dental X-Ray"]),
        tests("Dental Malocclusion", &["Oral Examination", "Skull X-Ray"]),
        tests("Epileptic Seizure", &[CBC, CHEM, "Neurological Examination"]),
        tests("Toxin Ingestion", &[CBC, CHEM, "Coagulation Profile"]),
        tests("Trauma", &[CBC, XRAY_CHEST, "Abdominal Ultrasound (FAST)"]),
        tests("Psittacosis", &["Chlamydia PCR", CBC]),
        tests("Egg Binding", &["Whole-Body Radiograph", "Calcium Level"]),
    ]
}

fn range(species: Species, metric: VitalMetric, min: f64, max: f64) -> VitalRange {
    VitalRange {
        species,
        metric,
        min,
        max,
    }
}

fn vital_ranges() -> Vec<VitalRange> {
    use crate::models::VitalMetric::{HeartRate, RespiratoryRate, Temperature};
    vec![
        range(Dog, HeartRate, 60.0, 140.0),
        range(Dog, RespiratoryRate, 10.0, 30.0),
        range(Dog, Temperature, 101.0, 102.5),
        range(Cat, HeartRate, 140.0, 220.0),
        range(Cat, RespiratoryRate, 20.0, 30.0),
        range(Cat, Temperature, 100.5, 102.5),
        range(Bird, HeartRate, 200.0, 400.0),
        range(Bird, RespiratoryRate, 15.0, 40.0),
        range(Bird, Temperature, 104.0, 108.0),
        range(Rabbit, HeartRate, 180.0, 250.0),
        range(Rabbit, RespiratoryRate, 30.0, 60.0),
        range(Rabbit, Temperature, 101.0, 103.0),
        // Generic bands: only flag readings implausible for any common pet.
        range(Other, HeartRate, 40.0, 400.0),
        range(Other, RespiratoryRate, 8.0, 60.0),
        range(Other, Temperature, 99.0, 108.0),
    ]
}

fn threshold(species: Species, breed: Option<&str>, years: f64) -> SeniorThreshold {
    SeniorThreshold {
        species,
        breed: breed.map(str::to_string),
        years,
    }
}

fn senior_thresholds() -> Vec<SeniorThreshold> {
    vec![
        threshold(Dog, None, 7.0),
        threshold(Cat, None, 10.0),
        threshold(Bird, None, 15.0),
        threshold(Rabbit, None, 6.0),
        threshold(Other, None, 8.0),
        threshold(Dog, Some("great dane"), 5.0),
        threshold(Dog, Some("bernese mountain dog"), 5.0),
        threshold(Dog, Some("german shepherd"), 6.0),
        threshold(Dog, Some("labrador retriever"), 7.0),
        threshold(Dog, Some("golden retriever"), 7.0),
        threshold(Dog, Some("beagle"), 8.0),
        threshold(Dog, Some("chihuahua"), 10.0),
        threshold(Dog, Some("jack russell terrier"), 10.0),
        threshold(Cat, Some("maine coon"), 9.0),
        threshold(Cat, Some("siamese"), 11.0),
        threshold(Bird, Some("budgerigar"), 5.0),
        threshold(Bird, Some("cockatiel"), 10.0),
        threshold(Bird, Some("african grey"), 25.0),
        threshold(Rabbit, Some("netherland dwarf"), 7.0),
    ]
}

fn band(species: Species, breed: Option<&str>, min_kg: f64, max_kg: f64) -> WeightBand {
    WeightBand {
        species,
        breed: breed.map(str::to_string),
        min_kg,
        max_kg,
    }
}

fn weight_bands() -> Vec<WeightBand> {
    vec![
        band(Dog, None, 5.0, 40.0),
        band(Cat, None, 3.5, 5.5),
        band(Rabbit, None, 1.5, 5.0),
        band(Dog, Some("labrador retriever"), 25.0, 36.0),
        band(Dog, Some("golden retriever"), 25.0, 34.0),
        band(Dog, Some("german shepherd"), 22.0, 40.0),
        band(Dog, Some("great dane"), 45.0, 80.0),
        band(Dog, Some("beagle"), 9.0, 14.0),
        band(Dog, Some("dachshund"), 7.0, 15.0),
        band(Dog, Some("chihuahua"), 1.5, 3.0),
        band(Cat, Some("maine coon"), 5.5, 8.5),
        band(Cat, Some("persian"), 3.0, 5.5),
        band(Cat, Some("siamese"), 2.5, 5.0),
        band(Bird, Some("budgerigar"), 0.03, 0.04),
        band(Bird, Some("cockatiel"), 0.08, 0.12),
        band(Bird, Some("african grey"), 0.4, 0.6),
        band(Rabbit, Some("netherland dwarf"), 0.9, 1.2),
        band(Rabbit, Some("holland lop"), 1.3, 1.8),
    ]
}

fn chronic(
    name: &str,
    aliases: &[&str],
    weight: f64,
    aggravators: &[Aggravator],
    predisposed_breeds: &[&str],
) -> ChronicConditionRule {
    ChronicConditionRule {
        name: name.into(),
        aliases: strings(aliases),
        weight,
        aggravators: aggravators.to_vec(),
        predisposed_breeds: strings(predisposed_breeds),
    }
}

fn chronic_conditions() -> Vec<ChronicConditionRule> {
    use super::Aggravator::{BreedPredisposition, Obesity, SeniorAge};
    vec![
        chronic("diabetes", &["diabetes mellitus"], 15.0, &[Obesity, SeniorAge, BreedPredisposition], &["miniature schnauzer", "poodle", "samoyed", "burmese"]),
        chronic("kidney disease", &["chronic kidney disease", "ckd", "renal failure"], 15.0, &[SeniorAge, BreedPredisposition], &["persian", "abyssinian"]),
        chronic("heart disease", &["heart failure", "cardiomyopathy", "mitral valve disease"], 15.0, &[SeniorAge, Obesity, BreedPredisposition], &["cavalier king charles spaniel", "doberman pinscher", "boxer", "maine coon"]),
        chronic("hip dysplasia", &[], 10.0, &[Obesity, BreedPredisposition], &["german shepherd", "labrador retriever", "golden retriever", "great dane"]),
        chronic("arthritis", &["osteoarthritis"], 10.0, &[Obesity, SeniorAge], &[]),
        chronic("dental disease", &["periodontal disease"], 8.0, &[SeniorAge, BreedPredisposition], &["chihuahua", "dachshund", "persian"]),
        chronic("hypothyroidism", &[], 10.0, &[Obesity], &["golden retriever", "doberman pinscher"]),
        chronic("hyperthyroidism", &[], 12.0, &[SeniorAge], &[]),
        chronic("epilepsy", &["seizure disorder"], 12.0, &[BreedPredisposition], &["beagle", "border collie"]),
        chronic("asthma", &["feline asthma"], 10.0, &[Obesity], &["siamese"]),
        chronic("cushing's disease", &["hyperadrenocorticism", "cushings"], 12.0, &[SeniorAge], &["poodle", "dachshund"]),
    ]
}

fn escalation(keyword: &str, rank: u8) -> EscalationKeyword {
    EscalationKeyword {
        keyword: keyword.into(),
        rank,
    }
}

#[allow(clippy::too_many_arguments)]
fn care(
    action: &str,
    category: CareCategory,
    species: SpeciesScope,
    min_age_years: f64,
    max_age_years: Option<f64>,
    life_stage: LifeStage,
    interval_days: i64,
    first_due_days: i64,
    priority: CarePriority,
    rationale: &str,
) -> CareScheduleRule {
    CareScheduleRule {
        action: action.into(),
        category,
        species,
        min_age_years,
        max_age_years,
        life_stage,
        interval_days,
        first_due_days,
        priority,
        rationale: rationale.into(),
    }
}

fn care_schedule() -> Vec<CareScheduleRule> {
    use crate::models::CareCategory::{Dental, ParasitePrevention, Vaccination, WellnessExam};
    use crate::models::CarePriority::{High, Medium};
    let only = SpeciesScope::only;
    vec![
        care("Primary {species} vaccination series", Vaccination, only(&[Dog, Cat]), 0.0, Some(1.0), LifeStage::Any, 21, 0, High, "Complete the primary immunization course"),
        care("Annual {species} vaccination booster", Vaccination, only(&[Dog, Cat, Rabbit]), 1.0, None, LifeStage::Any, 365, 30, High, "Maintain immunity against common diseases"),
        care("Professional dental cleaning", Dental, only(&[Dog, Cat]), 3.0, None, LifeStage::Any, 365, 60, Medium, "Prevent periodontal disease and maintain oral health"),
        care("Incisor and molar check", Dental, only(&[Rabbit]), 0.0, None, LifeStage::Any, 180, 60, Medium, "Rabbit teeth grow continuously and overgrowth causes malocclusion"),
        care("Semi-annual senior wellness exam", WellnessExam, SpeciesScope::Any, 0.0, None, LifeStage::Senior, 182, 90, High, "Early detection of age-related conditions"),
        care("Annual wellness exam", WellnessExam, SpeciesScope::Any, 0.0, None, LifeStage::NonSenior, 365, 180, Medium, "Routine health monitoring"),
        care("Year-round heartworm and flea prevention for {species}", ParasitePrevention, only(&[Dog]), 0.0, None, LifeStage::Any, 30, 0, High, "Continuous protection against parasites"),
        care("Monthly flea prevention for {species}", ParasitePrevention, only(&[Cat]), 0.0, None, LifeStage::Any, 30, 0, Medium, "Continuous protection against fleas"),
        care("Flea and mite prevention for {species}", ParasitePrevention, only(&[Rabbit]), 0.0, None, LifeStage::Any, 90, 0, Medium, "Mites and fleas are common in rabbits"),
    ]
}

fn lab(name: &str, category: &str, description: &str, retail: &str, discount: &str) -> LabTest {
    LabTest {
        name: name.into(),
        category: category.into(),
        description: description.into(),
        retail_price: retail.into(),
        discount_price: discount.into(),
    }
}

fn lab_tests() -> Vec<LabTest> {
    vec![
        lab("Heartworm Antigen Test", "Parasitology", "Canine heartworm antigen screen", "$65.00", "$18.50"),
        lab("4Dx Plus", "Parasitology", "Heartworm, Lyme, ehrlichia and anaplasma tick-borne disease screen", "$89.00", "$31.20"),
        lab("Fecal O&P", "Parasitology", "Fecal flotation for ova and parasites, intestinal worms and giardia", "$45.00", "$12.00"),
        lab("Chem 17", "Chemistry", "Comprehensive blood chemistry panel: kidney, liver, glucose, electrolytes", "$145.00", "$48.00"),
        lab("CBC with Differential", "Hematology", "Complete blood count for anemia, infection and inflammation", "$75.00", "$21.00"),
        lab("Total T4", "Endocrinology", "Thyroid hormone screen for hyperthyroidism and hypothyroidism", "$60.00", "$17.50"),
        lab("SDMA", "Chemistry", "Early marker of kidney function decline", "$49.00", "$14.70"),
        lab("Urinalysis Complete", "Urology", "Urine specific gravity, sediment and dipstick for kidney and urinary disease", "$58.00", "$16.00"),
        lab("Urine Culture", "Microbiology", "Bacterial culture and sensitivity for urinary tract infection", "$120.00", "$44.00"),
        lab("Spec cPL", "Gastroenterology", "Canine pancreatic lipase for pancreatitis with vomiting", "$95.00", "$32.00"),
        lab("Fructosamine", "Endocrinology", "Average blood glucose over two weeks for diabetes monitoring", "$70.00", "$22.40"),
        lab("FeLV/FIV Combo", "Infectious Disease", "Feline leukemia antigen and feline immunodeficiency antibody test", "$68.00", "$20.40"),
        lab("Canine Respiratory PCR Panel", "Infectious Disease", "PCR for kennel cough, coughing and respiratory pathogens", "$185.00", "$64.00"),
        lab("Allergy Panel", "Dermatology", "Environmental and food allergen panel for itching and skin disease", "$1,025.00", "$390.00"),
    ]
}
