use crate::io::ReferenceTables;
use crate::llm::ResponseSchema;
use crate::models::{ConnectionStatus, NO_GRIEVANCE_CODE};

/// Forced-choice connection check; `{transcript}` is replaced with the flattened text
const STATUS_PROMPT_TEMPLATE: &str = r#"CLASSIFY ONLY: Was this call CONNECTED (a conversation happened) or NOT CONNECTED?

CONNECTED if: ANY human response beyond ringing/busy/unreachable
NOT CONNECTED if: ringing, busy tone, switched off, no answer, network error

Transcript: {transcript}

Respond ONLY: "CONNECTED" or "NOT CONNECTED""#;

/// System prompt for the summarizer
pub const SUMMARY_SYSTEM_PROMPT: &str = r#"You are a Multilingual Call Transcript Summarizer.

Turn the RAW transcript into a CLEAR, NEUTRAL English summary of 4-6 sentences.

## RULES (MANDATORY):
- English ONLY. Translate every language accurately.
- FACTS ONLY. No analysis, no disposition codes, no connection-status guesses.
- Capture WHO spoke, WHAT was said and the CONVERSATION FLOW.
- Keep key numbers (EMI amount, dates) and the customer's responses.
- Make no assumptions.

## REQUIRED ELEMENTS:
1. Who answered? (customer verified / family member / wrong number)
2. Main topics (EMI / payment / complaint / callback)
3. Customer's key responses (promises / refusals / requests)
4. How the call ended (hung up / callback requested / etc.)

## NO ANALYSIS:
BAD: "STATUS: CONNECTED -> ANSWERED_BY_FAMILY_MEMBER"
GOOD: "Customer responded to the EMI reminder with questions"

## EXAMPLE:
RAW: "lender said: EMI 3450 is due, borrower said: I will pay tomorrow"
SUMMARY: "The agent reminded the customer of an EMI of 3450 that is due. The customer confirmed payment tomorrow."

Output a PLAIN TEXT SUMMARY ONLY. No bullets. No markdown."#;

/// Confidence, explanation and key-point protocol shared by both classifiers
const SCORING_PROTOCOL: &str = r#"You must also return a confidence score, an explanation and the key points.

i. KEY POINTS (produce these FIRST):
   Before choosing any code, list the main key points you understood from the summary.
   Keep them short and factual. Only after listing them, choose the code and fill the other fields.

ii. CONFIDENCE (clarity/confusion based):
   a. CLEAR and UNAMBIGUOUS evidence for a SINGLE code, with no overlap with other labels or descriptions: 1.0 or as close to 1.0 as the evidence allows.
   b. PARTIAL match or some AMBIGUITY (could fit more than one code, or key evidence is missing): between 1.00 and 0.50; the more confusion, the closer to 0.50.
   c. VAGUE clues where you must GUESS among several codes: between 0.50 and 0.00.
   d. Confidence reflects how sure you are that the evidence matches ONLY the chosen code.
   e. Do not restrict yourself to round numbers; 0.88, 0.94 or 0.13 are all valid.

iii. EXPLANATION:
   - Say why the chosen code fits, quoting the evidence from the summary that matches its label/description.
   - If confidence is high, say what made the decision clear.
   - If confidence is below 1.0, name the exact ambiguity, the overlapping code(s) and why this code was still chosen.
   - Always state both parts of the score, for example: "Confidence is 0.88 because <evidence>, with 0.12 uncertainty due to <specific ambiguity>.""#;

/// Build the forced-choice connection prompt
pub fn build_status_prompt(transcript_text: &str) -> String {
    STATUS_PROMPT_TEMPLATE.replace("{transcript}", transcript_text)
}

/// Build the disposition classifier system prompt from the full table
pub fn build_disposition_system_prompt(tables: &ReferenceTables) -> String {
    format!(
        r#"You are a Senior Call Center Disposition Classifier for Loan Collections.

You classify calls between a loan collections agent (lender) and a customer (borrower) about loan repayment or overdue payments.
You MUST classify the call using ONLY the provided disposition table.
Do NOT invent, infer or generalize categories.

You will receive:
1. A SUMMARY of the call
2. A FILTERED TABLE holding only the dispositions for the detected connection status

CONNECTION STATUS GROUPS:
CONNECTED DISPOSITIONS:
{connected}

NOT CONNECTED DISPOSITIONS:
{not_connected}

## CLASSIFICATION RULES (MANDATORY)
1. Pick ONLY from the FILTERED TABLE; it already matches the connection status.
2. NEVER cross status groups.
3. Match by SEMANTIC similarity to the label and description.
4. Match the EXACT scenario in the description; ignore generic conversation and look for SPECIFIC OUTCOMES.

## EXAMPLES
- "Hello! Hello." then silence -> CONNECTED -> "ANSWERED_DISCONNECTED"
- "Ringing... no answer" -> NOT CONNECTED -> "NO_ANSWER"
- "Wrong number, not here" -> CONNECTED -> "WRONG_NUMBER"
- "Will pay tomorrow" -> CONNECTED -> "PTP_ON_SPECIFIC_DATE"

## BLOCKED MATCHES (only when EXACT)
- ANSWERED_BY_FAMILY_MEMBER: ONLY if a family member/third person answered, the customer is unavailable AND a call later is suggested
- WRONG_NUMBER: ONLY if the person is not the customer AND says it is a wrong number

{protocol}

## OUTPUT
"Disposition_code": the EXACT code from the FILTERED TABLE
"confidence": number between 0 and 1
"explanation": explanation of the code and the confidence
"summary": null (it is filled in later)
"key_points": list of key points"#,
        connected = tables.render_status_group(ConnectionStatus::Connected),
        not_connected = tables.render_status_group(ConnectionStatus::NotConnected),
        protocol = SCORING_PROTOCOL,
    )
}

/// Build the disposition classifier user message
pub fn build_disposition_user_prompt(summary: &str, filtered_table: &str) -> String {
    format!(
        "Here is the summarized transcript. Classify it:\n\nSUMMARY:\n{}\n\nFILTERED TABLE:\n{}\n",
        summary, filtered_table
    )
}

/// Build the grievance classifier system prompt from the grievance table
pub fn build_grievance_system_prompt(tables: &ReferenceTables) -> String {
    format!(
        r#"You are an expert Grievance Subcategory Classification Assistant.

Your ONLY task: given a call summary, pick the MOST RELEVANT subcategory code from the table below.

---------------------------------------------
GRIEVANCE SUBCATEGORIES
{table}
---------------------------------------------

## RULES
1. Use ONLY the codes in the table above.
2. NEVER create new categories and NEVER guess outside the table.
3. Choose exactly ONE code, the closest semantic match.
4. If the summary does NOT describe a grievance, answer "{no_grievance}".

{protocol}

## OUTPUT
"Disposition_code": the EXACT subcategory code, or "{no_grievance}"
"confidence": number between 0 and 1
"explanation": explanation of the code and the confidence
"summary": null (it is filled in later)
"key_points": list of key points"#,
        table = tables.render_grievances(),
        no_grievance = NO_GRIEVANCE_CODE,
        protocol = SCORING_PROTOCOL,
    )
}

/// Build the grievance classifier user message
pub fn build_grievance_user_prompt(summary: &str) -> String {
    format!(
        "Here is the summarized transcript. Classify it into a grievance subcategory:\n\nSUMMARY:\n{}\n",
        summary
    )
}

/// Structured-output schema shared by the disposition and grievance classifiers
pub fn classification_schema(name: &str) -> ResponseSchema {
    ResponseSchema {
        name: name.to_string(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "key_points": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Key points understood from the summary, listed before choosing a code"
                },
                "Disposition_code": {
                    "type": "string",
                    "description": "Exact code from the provided table"
                },
                "confidence": {
                    "type": "number",
                    "description": "Confidence score from 0.0 to 1.0"
                },
                "explanation": {
                    "type": "string",
                    "description": "Why this code, and what accounts for any missing confidence"
                },
                "summary": {
                    "type": ["string", "null"],
                    "description": "Leave null"
                }
            },
            "required": ["key_points", "Disposition_code", "confidence", "explanation", "summary"],
            "additionalProperties": false
        }),
    }
}
