//! Prompt templates for reasoning tasks and verification

/// Templates for the GSM8K grade-school math task
pub struct Gsm8kTemplate;

impl Gsm8kTemplate {
    /// Direct-answer prompt
    pub fn standard(problem: &str) -> String {
        format!(
            r#"Answer the following math question. Finish with "the answer is n", where n is a number.

Question: {}
Answer:"#,
            problem
        )
    }

    /// Chain-of-thought prompt
    pub fn cot(problem: &str) -> String {
        format!(
            r#"Answer the following math question step by step.
First write a short plan on a line starting with "Strategy:", then carry out the plan.
Finish with "the answer is n", where n is a number.

Question: {}
"#,
            problem
        )
    }

    /// Instruction appended after a previous thought
    pub fn continuation() -> &'static str {
        "\n\nAbove is the previous thought. Build upon it to continue solving the question. \
You can modify the approach if needed. Answer to the question with 'the answer is n', where n is a number."
    }

    /// Proposal prompt: several alternative next steps, one per line
    pub fn propose(problem: &str, partial: &str) -> String {
        let mut prompt = format!(
            r#"Question: {}

Reasoning so far:
{}
"#,
            problem,
            if partial.is_empty() { "(none)" } else { partial }
        );
        prompt.push_str(
            r#"
Propose several different possible next steps of the solution.
Write exactly one step per line and nothing else.
If a step completes the solution, end it with "the answer is n", where n is a number."#,
        );
        prompt
    }

    /// Pointwise value prompt
    pub fn value(problem: &str, partial: &str) -> String {
        format!(
            r#"Evaluate whether the partial solution below is correct so far and can reach the right answer to the question.
Check every calculation. Conclude on the last line with exactly one word: sure, likely or impossible.

Question: {}

Partial solution:
{}

Evaluation:"#,
            problem, partial
        )
    }

    /// Batch vote prompt header
    pub fn vote_instructions() -> &'static str {
        r#"Given a math question and several candidate solutions, decide which choice is most promising.
Analyze each choice in detail, checking every calculation, then conclude in the last line "The best choice is {s}", where s is the integer id of the choice.
"#
    }

    /// Batch vote prompt listing every candidate as `Choice i`
    pub fn vote(problem: &str, candidates: &[String]) -> String {
        let mut prompt = format!("{}\nQuestion: {}\n\n", Self::vote_instructions(), problem);
        for (i, candidate) in candidates.iter().enumerate() {
            prompt.push_str(&format!("Choice {}:\n{}\n", i + 1, candidate));
        }
        prompt
    }
}

/// Templates for verifying a completed reasoning trace
pub struct VerifierTemplate;

impl VerifierTemplate {
    /// Verifier instructions
    pub fn instructions() -> &'static str {
        r#"As a critical mathematical reasoning verifier, evaluate the following thought process, which builds upon previous steps to reach a final conclusion. Focus on:

1. **Question Relevance**:
   - Ensure the entire reasoning process directly addresses the original question.
   - Check if the final answer actually solves what was asked.

2. **Reasoning Progression**:
   - Assess logical flow and consistency, especially in final steps.
   - Verify mathematical operations' correctness and appropriateness.
   - Identify logical fallacies or unjustified leaps.

3. **Factual Accuracy**:
   - Check accuracy and relevance of facts and numbers, particularly in final calculations.
   - Spot any misuse of mathematical concepts.

4. **Completeness**:
   - Ensure all necessary aspects are addressed, particularly in concluding thoughts.
   - Identify significant omissions that could affect the result.

5. **Critical Assessment**:
   - Actively seek potential errors or weak points.
   - Don't hesitate to invalidate reasoning if significant issues are found.

Provide a holistic evaluation of the entire reasoning process, from start to finish. Conclude with "Reasoning is Valid" only if the entire process is relevant, logically sound, and error-free. Otherwise, conclude with "Reasoning is Invalid" and briefly explain why."#
    }

    /// Full verification prompt
    pub fn verify(problem: &str, reasoning: &str) -> String {
        format!(
            "{}\n\nQuestion: {}\n\nReasoning to verify:\n{}\n\nVerification:",
            Self::instructions(),
            problem,
            reasoning
        )
    }
}
