use super::frequency::FrequencyTable;
use crate::models::analysis::AggregateAnalysis;
use crate::models::prescription::StructuredPrescription;
use crate::pipeline::extraction::confidence::is_low_confidence;

/// Rows kept in the diagnosis and medicine tables.
pub const TOP_N: usize = 5;

/// Cross-record statistics for a batch. Pure: recomputed from the full
/// slice on every call, and an empty slice yields the zeroed default.
pub fn analyze_prescriptions(prescriptions: &[StructuredPrescription]) -> AggregateAnalysis {
    let mut diagnoses = FrequencyTable::new();
    let mut medicines = FrequencyTable::new();
    let mut departments = FrequencyTable::new();
    let mut total_confidence = 0.0;
    let mut low_confidence = 0usize;
    let mut missing_age = 0usize;
    let mut missing_doctor = 0usize;

    for rx in prescriptions {
        for diagnosis in &rx.clinical.diagnosis {
            diagnoses.add(diagnosis);
        }
        for medicine in &rx.medicines {
            medicines.add(&medicine.name);
        }
        if let Some(department) = &rx.doctor.department {
            departments.add(department);
        }

        total_confidence += rx.confidence();
        if is_low_confidence(rx.confidence()) {
            low_confidence += 1;
        }
        if rx.patient.age.is_none() {
            missing_age += 1;
        }
        if rx.doctor.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
            missing_doctor += 1;
        }
    }

    let mut flags = Vec::new();
    if low_confidence > 0 {
        flags.push(format!("{low_confidence} prescription(s) have low OCR confidence"));
    }
    if missing_age > 0 {
        flags.push(format!("{missing_age} prescription(s) missing patient age"));
    }
    if missing_doctor > 0 {
        flags.push(format!("{missing_doctor} prescription(s) missing doctor name"));
    }

    let average_confidence = if prescriptions.is_empty() {
        0.0
    } else {
        total_confidence / prescriptions.len() as f64
    };

    tracing::debug!(
        total = prescriptions.len(),
        flags = flags.len(),
        average_confidence,
        "Aggregate analysis computed"
    );

    AggregateAnalysis {
        total_prescriptions: prescriptions.len(),
        common_diagnoses: diagnoses.ranked(Some(TOP_N)),
        top_medicines: medicines.ranked(Some(TOP_N)),
        department_distribution: departments.ranked(None),
        flags,
        average_confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::NameCount;
    use crate::models::prescription::Medicine;

    fn rx(id: &str, confidence: f64) -> StructuredPrescription {
        let mut rx = StructuredPrescription::new(id, confidence);
        rx.patient.age = Some(40);
        rx.doctor.name = Some("Dr. Sharma".into());
        rx
    }

    fn with_diagnoses(mut rx: StructuredPrescription, diagnoses: &[&str]) -> StructuredPrescription {
        rx.clinical.diagnosis = diagnoses.iter().map(|d| d.to_string()).collect();
        rx
    }

    fn with_medicines(mut rx: StructuredPrescription, names: &[&str]) -> StructuredPrescription {
        rx.medicines = names
            .iter()
            .map(|n| Medicine {
                name: n.to_string(),
                dosage: None,
                frequency: None,
                duration: None,
            })
            .collect();
        rx
    }

    #[test]
    fn empty_batch_is_zeroed() {
        let analysis = analyze_prescriptions(&[]);
        assert_eq!(analysis, AggregateAnalysis::default());
        assert_eq!(analysis.total_prescriptions, 0);
        assert_eq!(analysis.average_confidence, 0.0);
        assert!(!analysis.average_confidence.is_nan());
        assert!(analysis.flags.is_empty());
    }

    #[test]
    fn diagnoses_count_case_insensitively() {
        let batch = vec![
            with_diagnoses(rx("1", 0.9), &["Upper Respiratory Tract Infection"]),
            with_diagnoses(rx("2", 0.9), &["upper respiratory tract infection"]),
            with_diagnoses(rx("3", 0.9), &["Flu"]),
        ];
        let analysis = analyze_prescriptions(&batch);
        assert_eq!(
            analysis.common_diagnoses[0],
            NameCount::new("Upper respiratory tract infection", 2)
        );
        assert_eq!(analysis.common_diagnoses[1], NameCount::new("Flu", 1));
    }

    #[test]
    fn low_confidence_flag_counts_records() {
        let batch = vec![rx("1", 0.9), rx("2", 0.4), rx("3", 0.3)];
        let analysis = analyze_prescriptions(&batch);
        assert_eq!(analysis.flags, vec!["2 prescription(s) have low OCR confidence"]);
    }

    #[test]
    fn missing_field_flags_in_fixed_order() {
        let mut a = rx("1", 0.2);
        a.patient.age = None;
        let mut b = rx("2", 0.8);
        b.patient.age = None;
        b.doctor.name = None;
        let mut c = rx("3", 0.8);
        c.doctor.name = Some("  ".into());

        let analysis = analyze_prescriptions(&[a, b, c]);
        assert_eq!(
            analysis.flags,
            vec![
                "1 prescription(s) have low OCR confidence",
                "2 prescription(s) missing patient age",
                "2 prescription(s) missing doctor name",
            ]
        );
    }

    #[test]
    fn clean_batch_has_no_flags() {
        let analysis = analyze_prescriptions(&[rx("1", 0.5), rx("2", 0.7)]);
        assert!(analysis.flags.is_empty());
    }

    #[test]
    fn average_confidence_is_mean() {
        let analysis = analyze_prescriptions(&[rx("1", 0.9), rx("2", 0.4), rx("3", 0.2)]);
        assert!((analysis.average_confidence - 0.5).abs() < 1e-9);
        assert_eq!(analysis.total_prescriptions, 3);
    }

    #[test]
    fn medicines_truncated_to_top_five() {
        let batch = vec![
            with_medicines(rx("1", 0.9), &["Paracetamol", "Cetirizine", "Amoxicillin", "Pantoprazole"]),
            with_medicines(rx("2", 0.9), &["paracetamol", "Azithromycin", "Ondansetron", "Metformin"]),
            with_medicines(rx("3", 0.9), &["Cetirizine", "PARACETAMOL"]),
        ];
        let analysis = analyze_prescriptions(&batch);
        assert_eq!(analysis.top_medicines.len(), 5);
        assert_eq!(analysis.top_medicines[0], NameCount::new("Paracetamol", 3));
        assert_eq!(analysis.top_medicines[1], NameCount::new("Cetirizine", 2));
        // Remaining singletons keep first-seen order.
        let tail: Vec<&str> = analysis.top_medicines[2..].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(tail, vec!["Amoxicillin", "Pantoprazole", "Azithromycin"]);
    }

    #[test]
    fn departments_are_not_truncated() {
        let departments = ["ENT", "Cardiology", "Orthopedics", "Pediatrics", "Dermatology", "General Medicine", "ent"];
        let batch: Vec<StructuredPrescription> = departments
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut r = rx(&i.to_string(), 0.9);
                r.doctor.department = Some(d.to_string());
                r
            })
            .collect();
        let analysis = analyze_prescriptions(&batch);
        assert_eq!(analysis.department_distribution.len(), 6);
        assert_eq!(analysis.department_distribution[0], NameCount::new("Ent", 2));
        assert_eq!(analysis.department_distribution[5].name, "General medicine");
    }

    #[test]
    fn recomputed_from_scratch_each_call() {
        let mut batch = vec![with_diagnoses(rx("1", 0.9), &["Flu"])];
        let first = analyze_prescriptions(&batch);
        batch.push(with_diagnoses(rx("2", 0.3), &["Flu"]));
        let second = analyze_prescriptions(&batch);

        assert_eq!(first.common_diagnoses, vec![NameCount::new("Flu", 1)]);
        assert_eq!(second.common_diagnoses, vec![NameCount::new("Flu", 2)]);
        assert_eq!(second.total_prescriptions, 2);
        assert_eq!(analyze_prescriptions(&batch), second);
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(analyze_prescriptions(&[rx("1", 0.9)])).unwrap();
        assert_eq!(json["totalPrescriptions"], 1);
        assert!(json.get("commonDiagnoses").is_some());
        assert!(json.get("departmentDistribution").is_some());
        assert!(json.get("averageConfidence").is_some());
    }
}
