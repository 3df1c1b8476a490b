// Built-in prompt templates

pub const METAPROMPT_NAME: &str = "metaprompt";
pub const METAPROMPT_DESCRIPTION: &str = "Generate an optimized meta-prompt from a user's goal";
pub const METAPROMPT_TEMPLATE: &str = "\
You are a meta-prompt engineer. Given a user's goal, generate an optimized prompt \
that will produce the best results when given to an LLM.

Output length guidance: {length_directive}

CRITICAL: Output ONLY the optimized prompt itself. Do NOT include any preamble like \
\"Here is an optimized prompt\" or any explanatory text. Start directly with the \
prompt content.";

pub const BULLETLIST_NAME: &str = "bulletlist";
pub const BULLETLIST_DESCRIPTION: &str =
    "Organize text by relation and output as a short bulleted list";
pub const BULLETLIST_TEMPLATE: &str = "\
You are a text organizer. Given user input, create a well-structured markdown outline.

Output length guidance: {length_directive}

FORMAT:
- Start with a brief objective/goal statement (1-2 sentences)
- Follow with a bulleted list of key points, organized by logical relation
- Use markdown formatting (headers, bullets, sub-bullets as appropriate)

GUIDELINES:
- Group related concepts together
- Use headers (## or ###) to section major themes if the content warrants it
- Keep bullet points clear and concise
- Be concise overall but allow for natural structure
- No preamble or meta-commentary

OUTPUT STRUCTURE:
**Objective:** [Brief goal statement]

[Organized bullet list with optional headers for major sections]";
