//! Prompt templates and budget-bounded composition.
//!
//! The two templates are process-wide constants with an explicit
//! formatting function; nothing else in the loop does string
//! interpolation. Composition re-renders while over the token budget,
//! dropping the oldest history entry each pass, but never cuts the view
//! below the 3 newest entries, accepting a degraded over-budget prompt
//! instead of failing. The notepad is substituted in full every time;
//! surviving truncation is its purpose.

use graphscout_core::history::History;

use crate::token::fits;

/// Prompt token budget.
pub const TOKEN_LIMIT: usize = 50_000;

/// The truncation floor: the history view never shrinks below this.
pub const MIN_HISTORY_ENTRIES: usize = 3;

/// Template used on normal iterations: three tools, exploration allowed.
const SYSTEM_INSTRUCTIONS: &str = r#"You are a graph research assistant that works step by step, calls functions to gather information, and ultimately aims to achieve the user's objective.

**INSTRUCTIONS:**
- At each step your response and function responses will be fed back to you in order for you to proceed. The idea is for you to call the query_graph function, get the results, determine if you need to gather more information, call it again, aggregate the information, and when you are finally done, call the finish_response function to provide your final answer.
- You also have access to a persistent 'notepad' where you should write down important findings, plans, and open questions. The notepad is persistent and will be available throughout: the history will go away, but the notepad content will not, and you can update it using the write_to_notepad function. Suggested to update every 5 iterations.
- You do NOT have to call a function on every single iteration; it is completely okay to spend an iteration thinking about the information gathered so far. In that case your response is simply fed back to you so you can proceed.
- You have a maximum number of iterations to achieve the user's objective. You are currently on iteration {current_iteration} out of a maximum of {max_iterations}. You MUST call the finish_response function before the maximum number of iterations is reached.
- An explicit call to the finish_response function is required to end the loop.
- You must be factual, thorough, and aggregate information from the calls.
- Citations:
    - Cite information ids using square brackets in your response, for example: "this is some information [1234]". This is essential for the user to be able to verify the information.
    - The user does not have access to the content retrieved from the graph database, so you must provide all relevant information in your response in full; do not merely point at a citation.
    - Under no circumstances may you make up citations or provide false information. Only provide information based on analysis of results gathered from the functions you call.
    - For citations already present in the objective, propagate them unmodified to the final response where appropriate.
- Your final response must be a 'content' string: your final answer to the user's objective in structured markdown, using all of the analysis you have conducted. No preliminary comments or markdown code fences are allowed. Unless the objective specifies otherwise, use in-place square bracket citations, for example "The sky is blue [1][2][3]."
- On every iteration your thoughts, analysis and results must be structured markdown (function calls excepted), with no markdown prefixes or suffixes.
- Use your best judgement everywhere applicable.

**CURRENT DATE:**
{current_date}

**YOUR HISTORY:**
{history}

**USER OBJECTIVE:**
{objective}

**NOTEPAD:**
{notepad}

**FUNCTIONS:**
You have access to 3 functions:
1. query_graph: takes a query string and queries the global financial knowledge graph for context relevant to the query.
2. write_to_notepad: takes a content string and adds it to your notepad. Returns a success message.
3. finish_response: takes a content string; returns your final results to the user and ends the loop.

You may call 1 function at a time."#;

/// Template used once the iteration ceiling is hit: one tool, no choice.
const FORCED_FINISH_INSTRUCTIONS: &str = r#"You are a research assistant that works step by step, calls functions to gather information, and ultimately aims to achieve the user's objective.

**YOU HAVE REACHED THE MAXIMUM NUMBER OF ITERATIONS AND MUST RETURN A 'finish_response' FUNCTION CALL NOW.**

- Citations:
    - Cite information ids using square brackets in your response, for example: "this is some information [1234]". This is essential for the user to be able to verify the information.
    - The user does not have access to the content retrieved from the graph database, so you must provide all relevant information in your response in full; do not merely point at a citation.
    - Under no circumstances may you make up citations or provide false information. Only provide information based on analysis of results gathered from the functions you call.
    - For citations already present in the objective, propagate them unmodified to the final response where appropriate.
- Your final response must be a 'content' string: your final answer to the user's objective in structured markdown, using all of the analysis you have conducted. No preliminary comments or markdown code fences are allowed. Unless the objective specifies otherwise, use in-place square bracket citations, for example "The sky is blue [1][2][3]."

**INSTRUCTIONS:**
- You must call the finish_response function to provide your final answer and citations based on the history and the user's objective.

**CURRENT DATE:**
{current_date}

**YOUR HISTORY:**
{history}

**USER OBJECTIVE:**
{objective}

**NOTEPAD:**
{notepad}

**FUNCTIONS:**
You have access to ONE function which you MUST CALL NOW:

1. finish_response: takes a content string; returns your final results to the user and ends the loop."#;

/// Which template to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Normal,
    ForcedFinish,
}

/// Everything substituted into a template besides the history view.
#[derive(Debug, Clone)]
pub struct PromptInputs<'a> {
    pub objective: &'a str,
    pub notepad: &'a str,
    pub current_iteration: u32,
    pub max_iterations: u32,
    pub current_date: &'a str,
}

/// Compose a prompt under the default token budget.
pub fn compose(kind: PromptKind, history: &History, inputs: &PromptInputs<'_>) -> String {
    compose_with_limit(kind, history, inputs, TOKEN_LIMIT)
}

/// Compose a prompt under an explicit token budget.
///
/// Drops the oldest history entry and re-renders while the prompt exceeds
/// the budget and more than [`MIN_HISTORY_ENTRIES`] entries remain in the
/// view. The underlying history is never mutated.
pub fn compose_with_limit(
    kind: PromptKind,
    history: &History,
    inputs: &PromptInputs<'_>,
    limit: usize,
) -> String {
    let mut skip = 0usize;
    loop {
        let prompt = render(kind, &history.render_from(skip), inputs);
        if fits(&prompt, limit) || history.len().saturating_sub(skip) <= MIN_HISTORY_ENTRIES {
            return prompt;
        }
        skip += 1;
    }
}

fn render(kind: PromptKind, history_text: &str, inputs: &PromptInputs<'_>) -> String {
    let template = match kind {
        PromptKind::Normal => SYSTEM_INSTRUCTIONS,
        PromptKind::ForcedFinish => FORCED_FINISH_INSTRUCTIONS,
    };
    template
        .replace("{current_date}", inputs.current_date)
        .replace("{history}", history_text)
        .replace("{objective}", inputs.objective)
        .replace("{notepad}", inputs.notepad)
        .replace("{current_iteration}", &inputs.current_iteration.to_string())
        .replace("{max_iterations}", &inputs.max_iterations.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs<'a>(objective: &'a str, notepad: &'a str) -> PromptInputs<'a> {
        PromptInputs {
            objective,
            notepad,
            current_iteration: 2,
            max_iterations: 10,
            current_date: "2025-03-20",
        }
    }

    #[test]
    fn all_placeholders_substituted() {
        let mut history = History::new();
        history.push_notice("a tool result");

        let prompt = compose(
            PromptKind::Normal,
            &history,
            &inputs("What is the FY2024 revenue of Company X?", "notes here"),
        );

        assert!(prompt.contains("FY2024 revenue of Company X"));
        assert!(prompt.contains("a tool result"));
        assert!(prompt.contains("notes here"));
        assert!(prompt.contains("iteration 2 out of a maximum of 10"));
        assert!(prompt.contains("2025-03-20"));
        for placeholder in [
            "{objective}",
            "{notepad}",
            "{history}",
            "{current_date}",
            "{current_iteration}",
            "{max_iterations}",
        ] {
            assert!(!prompt.contains(placeholder), "leftover {placeholder}");
        }
    }

    #[test]
    fn forced_template_advertises_single_function() {
        let history = History::new();
        let prompt = compose(PromptKind::ForcedFinish, &history, &inputs("objective", ""));
        assert!(prompt.contains("MUST RETURN A 'finish_response' FUNCTION CALL NOW"));
        assert!(prompt.contains("ONE function"));
        assert!(!prompt.contains("query_graph"));
    }

    #[test]
    fn truncation_drops_oldest_first() {
        let mut history = History::new();
        for i in 0..8 {
            // Each entry ~2000 tokens
            history.push_notice(format!("entry-{i} {}", "x".repeat(8000)));
        }

        // Budget that fits roughly four entries plus the template
        let prompt = compose_with_limit(
            PromptKind::Normal,
            &history,
            &inputs("objective", ""),
            9_000,
        );

        assert!(!prompt.contains("entry-0"));
        assert!(prompt.contains("entry-7"));
        // The record itself is untouched
        assert_eq!(history.len(), 8);
    }

    #[test]
    fn truncation_never_goes_below_floor() {
        let mut history = History::new();
        for i in 0..6 {
            history.push_notice(format!("entry-{i} {}", "x".repeat(8000)));
        }

        // Budget nothing could satisfy: still keeps the newest 3 entries
        let prompt = compose_with_limit(PromptKind::Normal, &history, &inputs("objective", ""), 1);

        for kept in ["entry-3", "entry-4", "entry-5"] {
            assert!(prompt.contains(kept), "missing {kept}");
        }
        for dropped in ["entry-0", "entry-1", "entry-2"] {
            assert!(!prompt.contains(dropped), "should have dropped {dropped}");
        }
    }

    #[test]
    fn short_history_composes_without_truncation() {
        let mut history = History::new();
        history.push_notice("only entry");
        let prompt = compose_with_limit(PromptKind::Normal, &history, &inputs("objective", ""), 1);
        assert!(prompt.contains("only entry"));
    }

    #[test]
    fn notepad_survives_history_truncation() {
        let mut history = History::new();
        for i in 0..6 {
            history.push_notice(format!("entry-{i} {}", "y".repeat(8000)));
        }

        let prompt = compose_with_limit(
            PromptKind::Normal,
            &history,
            &inputs("objective", "durable finding [42]"),
            1,
        );
        assert!(prompt.contains("durable finding [42]"));
    }
}
