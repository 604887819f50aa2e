//! 各阶段使用的提示词

pub const TOOL_EXTRACTION_SYSTEM: &str = include_str!("tool_extraction_system.tpl");
pub const TOOL_ANALYSIS_SYSTEM: &str = include_str!("tool_analysis_system.tpl");
pub const RECOMMENDATIONS_SYSTEM: &str = include_str!("recommendations_system.tpl");

pub fn tool_extraction_user(query: &str, content: &str) -> String {
    format!(include_str!("tool_extraction_user.tpl"), query, content, query)
}

pub fn tool_analysis_user(company_name: &str, content: &str) -> String {
    format!(include_str!("tool_analysis_user.tpl"), company_name, content)
}

pub fn recommendations_user(query: &str, company_data: &str) -> String {
    format!(include_str!("recommendations_user.tpl"), query, company_data)
}
