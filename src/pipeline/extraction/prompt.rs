pub const EXTRACTION_SYSTEM_PROMPT: &str = "\
You are a medical AI assistant that extracts structured data from prescription text. \
Always respond with valid JSON only, no markdown.";

const EXTRACTION_INSTRUCTIONS: &str = r#"You extract structured data from the recognized text of a handwritten doctor's prescription.

RULES:
1. Extract only information that is explicitly present or can be reasonably inferred.
2. Use null for missing fields. Never fabricate data.
3. Keep frequencies as written (e.g., BD, TDS, OD).
4. Tolerate spelling mistakes and handwriting artifacts.
5. Put each symptom, diagnosis and medicine in its own array item.
6. Estimate confidence from text clarity and completeness.

OUTPUT SCHEMA (JSON):
{
  "patient": {"name": "string or null", "age": "number or null", "gender": "Male | Female | Other | null"},
  "doctor": {"name": "string or null", "department": "string or null"},
  "visit": {"date": "YYYY-MM-DD or null", "type": "OPD | IPD | null"},
  "clinical": {"symptoms": ["symptom"], "diagnosis": ["diagnosis"]},
  "medicines": [
    {"name": "medicine name", "dosage": "e.g., 650mg", "frequency": "e.g., BD", "duration": "e.g., 5 days"}
  ],
  "additionalNotes": {"advice": "string or null", "followUp": "e.g., Review after 1 week"},
  "confidence": 0.0
}

COMMON ABBREVIATIONS:
- Frequencies: OD (once daily), BD (twice daily), TDS (three times daily), QDS (four times daily), SOS (as needed), HS (at bedtime)
- Routes: PO (oral), IV (intravenous), IM (intramuscular)
- Clinical: C/O (complains of), H/O (history of), Dx (diagnosis), Rx (prescription)
- Forms: Tab (tablet), Cap (capsule), Syp (syrup), Inj (injection)
- Conditions: URTI (upper respiratory tract infection), UTI (urinary tract infection), AGE (acute gastroenteritis)

CONFIDENCE:
- 0.9-1.0: clear text, all major fields present
- 0.7-0.89: most fields readable, some inference needed
- 0.5-0.69: significant portions unclear or missing
- below 0.5: major readability issues

Return ONLY valid JSON for the following text:"#;

/// Build the extraction prompt for one prescription's recognized text.
pub fn build_extraction_prompt(raw_text: &str) -> String {
    format!("{EXTRACTION_INSTRUCTIONS}\n\n<prescription>\n{raw_text}\n</prescription>")
}

/// Instruction sent with the prescription photo to the vision model.
pub const RECOGNITION_SYSTEM_PROMPT: &str = "\
You are an OCR assistant. Extract ALL visible text from the image exactly as written, \
preserving the original layout and line breaks. Include all handwritten text, even if unclear.";

pub const RECOGNITION_USER_PROMPT: &str = "\
Extract all text from this prescription image. \
Return only the extracted text, preserving line breaks and layout.";
