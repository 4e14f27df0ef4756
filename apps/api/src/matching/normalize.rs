//! Skill token canonicalization.

/// Known spellings that refer to the same skill, keyed by lowercase form.
const SKILL_ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("react.js", "react"),
    ("reactjs", "react"),
    ("node.js", "node"),
    ("nodejs", "node"),
    ("vue.js", "vue"),
    ("vuejs", "vue"),
    ("py", "python"),
    ("aws cloud", "aws"),
    ("amazon web services", "aws"),
    ("azure cloud", "azure"),
    ("ms azure", "azure"),
    ("google cloud", "gcp"),
    ("google cloud platform", "gcp"),
    ("k8s", "kubernetes"),
    ("next.js", "nextjs"),
    ("postgres", "postgresql"),
    ("mongo", "mongodb"),
    ("ts", "typescript"),
];

/// Lowercases and trims `skill`, then maps known aliases to their canonical name.
///
/// Total and idempotent: no canonical name is itself an alias.
pub fn normalize_skill(skill: &str) -> String {
    let lowered = skill.trim().to_lowercase();
    SKILL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or(lowered)
}
