// Prompt templates for answer and cover-letter drafting.
// Placeholders are replaced with `str::replace` before sending.

/// Batch answer prompt. Replace `{resume_summary}`, `{job_description}`,
/// `{question_text}` and `{format_instruction}`.
pub const ANSWERS_PROMPT_TEMPLATE: &str = "\
Here is my resume summary:
{resume_summary}

Job description:
{job_description}

Here are the application questions that need answers:
{question_text}

Draft concise, natural answers (2-3 sentences) for each question.
{format_instruction}";

/// Cover letter prompt. Replace `{resume_summary}`, `{company}`, `{title}`
/// and `{job_description}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = "\
Here is my resume summary:
{resume_summary}

Write a cover letter for the {title} position at {company}.

Job description:
{job_description}

Keep it under 300 words, in three or four short paragraphs, first person, \
with no placeholders such as [Your Name]. Return only the letter text.";
