//! Prompt texts: extraction template, advising policy and course-map
//! instructions, plus the char-budgeted context block.

use serde::Serialize;

/// System message for field extraction.
pub const EXTRACTION_SYSTEM: &str = "You are a specialized text extraction tool.";

/// User message for course-map generation.
pub const COURSE_MAP_USER: &str = "Create a course map based on the context.";

/// Extraction instructions. `{input}` is replaced with the question (or a
/// previous result rendered as JSON).
const EXTRACTION_TEMPLATE: &str = r#"Instructions:
- You are an advanced language parser.
- Extract and return only the details listed below from the given input.
- Extract:
  - Course Codes (e.g., CSE 330, MAT 101, EEE 220)
  - Categories (e.g., 'Gold', 'Silver', 'Elective', 'Core')
  - Semesters (e.g., 1, 2, spring, fall)
  - Description (e.g., An introductory course on problem solving with the Java programming language.)
  - Critical Requirement (e.g., True)
  - Total Credits (e.g., 3)
  - Next Subject Codes (e.g., 'CSE 230')
  - Prior Requirements (e.g., 'CSE 110')
  - Category (includes 'Gold' and 'SCIT')
  - Session (e.g., 'C')
  - Optional (e.g., 'False')
  - Minimum Passing Grade (e.g., 'C')
- Return every detail that is not found as an empty list.
- Include 'Prior Requirements' and 'Next Subject Codes' in 'Course Codes' as well.

Format the output strictly as one JSON object of this shape:
{
    "Course Codes": [],
    "Categories": [],
    "Semesters": [],
    "Description": [],
    "Critical Requirement": [],
    "Total Credits": [],
    "Next Subject Codes": [],
    "Prior Requirements": [],
    "Category": [],
    "Session": [],
    "Optional": [],
    "Minimum_passing_Grade": []
}

Input:
{input}
"#;

/// Advising policy placed ahead of the context in the answer prompt.
pub const ADVISING_RULES: &str = r#"Instructions:
- You are an assistant for student advising, helping students finish their courses on time.
- Answer truthfully and factually using only the context presented.
- Be correct, factual, precise and reliable.
- Every student has to take a SCIT course.
- Ask students for their ALEKS placement score before answering:
  - 0-60 places the student in MAT 117.
  - 61-75 places the student in MAT 170.
  - 76-100 places the student in MAT 265.
- SCIT sequences:
  - PHY 101, PHY 180 and PHY 220
  - CHEM 101, CHEM 160 and CHEM 220
  - BIO 101, BIO 160 and BIO 220
- Guide the student to complete physics, chemistry or biology fully; they cannot switch sequences.
- When no ALEKS score is given, assume 75.
"#;

/// Course-map instructions placed ahead of the context.
pub const COURSE_MAP_INSTRUCTIONS: &str = r#"Instructions:
- You are an assistant tasked with generating a comprehensive course map.
- Use the provided context to describe courses, their prior requirements, next subjects and other relevant details.
- Cover every course code, from the 1st to the 8th semester.
- Cover all critical subjects.
- Place prerequisites in semesters before the courses that need them.
"#;

pub fn extraction_prompt(input: &str) -> String {
    EXTRACTION_TEMPLATE.replace("{input}", input.trim())
}

/// Advising system message: rules, then `{"context": …, "results": …}`.
pub fn advising_system<C: Serialize, R: Serialize>(
    context: &[C],
    results: &[R],
    max_chars: usize,
) -> Result<String, serde_json::Error> {
    let block = context_block(context, Some(results), max_chars)?;
    Ok(format!("{ADVISING_RULES}\nContext:\n{block}\n"))
}

/// Course-map system message: instructions, then the context entries.
pub fn course_map_system<C: Serialize>(
    context: &[C],
    max_chars: usize,
) -> Result<String, serde_json::Error> {
    let block = context_block::<C, ()>(context, None, max_chars)?;
    Ok(format!(
        "{COURSE_MAP_INSTRUCTIONS}\nContext:\n{block}\n\n\
         Generate a well-structured map describing the relationships and details of each course.\n"
    ))
}

/// Renders context (and results) as JSON within `max_chars`.
///
/// Oldest context entries are dropped first; if the newest entry plus the
/// results still do not fit, the text is cut at a char boundary.
fn context_block<C: Serialize, R: Serialize>(
    context: &[C],
    results: Option<&[R]>,
    max_chars: usize,
) -> Result<String, serde_json::Error> {
    let mut skip = 0usize;
    loop {
        let kept = &context[skip..];
        let text = match results {
            Some(r) => serde_json::to_string(&serde_json::json!({
                "context": kept,
                "results": r,
            }))?,
            None => serde_json::to_string(kept)?,
        };
        if text.len() <= max_chars || skip >= context.len() {
            return Ok(safe_truncate(&text, max_chars).to_string());
        }
        skip += 1;
    }
}

pub fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}
