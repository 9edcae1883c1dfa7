//! Per-tool prompt templates.
//!
//! These are configuration data: each system prompt encodes the JSON shape
//! the tool's `data` field documents. The user prompt carries the language
//! hint and the source text.

use assist_types::{PrRequest, Tool, ToolRequest};

pub const DEFAULT_PRINCIPLES: [&str; 4] = ["SOLID", "DRY", "KISS", "Clean Code"];
pub const DEFAULT_FOCUS_AREAS: [&str; 4] = [
    "time complexity",
    "space complexity",
    "memory usage",
    "execution speed",
];

const DEBUG_PROMPT: &str = r#"You are an expert code debugger. Analyze the provided code and identify:
1. Syntax errors with line numbers
2. Logic errors and potential bugs
3. Runtime errors that could occur
4. Edge cases that aren't handled
5. Null/undefined reference issues
6. Type mismatches

Format your response as JSON with the following structure:
{
  "syntaxErrors": [{ "line": number, "error": "description", "suggestion": "fix" }],
  "logicErrors": [{ "line": number, "error": "description", "suggestion": "fix" }],
  "runtimeErrors": [{ "line": number, "error": "description", "suggestion": "fix" }],
  "edgeCases": [{ "description": "description", "suggestion": "fix" }],
  "summary": "overall summary",
  "fixedCode": "corrected code if applicable",
  "severity": "low|medium|high|critical"
}"#;

const PR_PROMPT: &str = r#"You are an expert at writing pull request descriptions. Generate a comprehensive PR description.

Provide:
1. A clear, descriptive title
2. Summary of changes
3. Detailed description
4. Testing instructions
5. Checklist items
6. Related issues/tickets format

Format your response as JSON:
{
  "title": "PR title",
  "summary": "brief summary",
  "description": "detailed markdown description",
  "changes": [{ "file": "filename", "change": "what changed" }],
  "testingInstructions": ["step by step testing"],
  "checklist": ["- [ ] item"],
  "breakingChanges": ["any breaking changes"],
  "relatedIssues": "format for linking issues",
  "reviewers": ["suggested reviewer roles"],
  "labels": ["suggested labels"],
  "fullMarkdown": "complete PR description in markdown"
}"#;

fn refactor_prompt(principles: &[String]) -> String {
    format!(
        r#"You are an expert code refactoring specialist. Apply clean code principles to refactor the provided code.
Focus on these principles: {}

Provide:
1. Refactored code with improvements
2. List of changes made
3. Explanation of each principle applied
4. Before/after comparison for key changes

Format your response as JSON:
{{
  "refactoredCode": "the improved code",
  "changes": [{{ "type": "principle applied", "description": "what was changed", "before": "old code snippet", "after": "new code snippet" }}],
  "principlesApplied": [{{ "principle": "name", "explanation": "how it was applied" }}],
  "improvements": ["list of improvements"],
  "readabilityScore": {{ "before": number, "after": number }},
  "summary": "overall summary"
}}"#,
        principles.join(", ")
    )
}

fn optimize_prompt(focus_areas: &[String]) -> String {
    format!(
        r#"You are an expert code optimization specialist. Analyze and optimize the provided code.
Focus areas: {}

Provide:
1. Optimized version of the code
2. Performance analysis (Big O notation for time and space)
3. Specific optimizations made
4. Benchmarking suggestions
5. Trade-offs of optimizations

Format your response as JSON:
{{
  "optimizedCode": "the optimized code",
  "performanceAnalysis": {{
    "original": {{ "timeComplexity": "O(?)", "spaceComplexity": "O(?)" }},
    "optimized": {{ "timeComplexity": "O(?)", "spaceComplexity": "O(?)" }}
  }},
  "optimizations": [{{ "type": "optimization type", "description": "what was optimized", "impact": "expected improvement" }}],
  "tradeoffs": ["list of tradeoffs"],
  "benchmarkSuggestions": ["how to benchmark"],
  "memoryImprovements": ["memory-related improvements"],
  "summary": "overall summary"
}}"#,
        focus_areas.join(", ")
    )
}

fn test_prompt(framework: &str) -> String {
    format!(
        r#"You are an expert software tester. Generate comprehensive test cases for the provided code.
Test framework preference: {}

Provide:
1. Unit tests covering all functions/methods
2. Edge case tests
3. Integration test suggestions
4. Test data/fixtures
5. Mock suggestions for dependencies
6. Code coverage analysis

Format your response as JSON:
{{
  "testCode": "complete test file code",
  "testCases": [{{ "name": "test name", "description": "what it tests", "type": "unit|integration|edge", "code": "test code" }}],
  "edgeCases": [{{ "scenario": "description", "testCode": "test for this case" }}],
  "mockSuggestions": [{{ "dependency": "what to mock", "mockCode": "how to mock it" }}],
  "fixtures": {{ "testData": "sample test data" }},
  "coverageAnalysis": {{ "functionsToTest": ["list"], "branchesToCover": ["list"] }},
  "summary": "overall test strategy summary"
}}"#,
        framework
    )
}

/// System prompt for one tool, with the request's options interpolated.
pub fn system_prompt(tool: Tool, request: &ToolRequest) -> String {
    match tool {
        Tool::Debug => DEBUG_PROMPT.to_string(),
        Tool::Refactor => {
            let defaults: Vec<String> = DEFAULT_PRINCIPLES.iter().map(|s| s.to_string()).collect();
            refactor_prompt(request.principles.as_deref().unwrap_or(&defaults))
        }
        Tool::Optimize => {
            let defaults: Vec<String> = DEFAULT_FOCUS_AREAS.iter().map(|s| s.to_string()).collect();
            optimize_prompt(request.focus_areas.as_deref().unwrap_or(&defaults))
        }
        Tool::Test => test_prompt(
            request
                .test_framework
                .as_deref()
                .filter(|f| !f.is_empty())
                .unwrap_or("auto-detect"),
        ),
    }
}

/// User prompt shared by all four analysis tools.
pub fn user_prompt(language: Option<&str>, source: &str) -> String {
    format!(
        "Language: {}\n\nCode:\n{}",
        language.filter(|l| !l.is_empty()).unwrap_or("auto-detect"),
        source
    )
}

pub fn pr_system_prompt() -> &'static str {
    PR_PROMPT
}

pub fn pr_user_prompt(request: &PrRequest) -> String {
    format!(
        "\nLanguage: {}\nSuggested Title: {}\nChanges Summary: {}\n\nOriginal Code:\n{}\n\nModified Code:\n{}\n",
        request.language.as_deref().filter(|l| !l.is_empty()).unwrap_or("auto-detect"),
        request.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Auto-generated PR"),
        request.changes.as_deref().filter(|c| !c.is_empty()).unwrap_or("See code diff"),
        request.original_code,
        request.modified_code,
    )
}
