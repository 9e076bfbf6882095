//! # 系统提示词
//!
//! 根据作品集内容生成发送给模型的系统指令：
//! 简介、技能、每个项目一行、每段经历一行，最后是回答准则。

use crate::models::portfolio::Portfolio;

/// 生成系统指令文本
///
/// # 参数
/// - `portfolio` - 作品集内容
///
/// # 返回值
/// 完整的系统指令；内容不变时结果也不变
pub fn build_system_instruction(portfolio: &Portfolio) -> String {
    let profile = &portfolio.profile;
    let name = profile.name.as_str();

    let projects = portfolio
        .projects
        .iter()
        .map(|p| {
            format!(
                "- {}: {} (Stack: {})",
                p.title,
                p.description,
                p.tech_stack.join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let experience = portfolio
        .experience
        .iter()
        .map(|e| {
            format!(
                "- {} at {} ({}): {}",
                e.role,
                e.organization,
                e.period,
                e.description.join(" ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are the AI Assistant for {name}'s portfolio website.\n\
         Your goal is to represent {name}, a {title}, to potential recruiters, clients, or fellow engineers.\n\
         \n\
         Here is {name}'s resume context:\n\
         Bio: {bio}\n\
         Skills: {skills}\n\
         \n\
         Projects:\n\
         {projects}\n\
         \n\
         Experience:\n\
         {experience}\n\
         \n\
         Guidelines:\n\
         1. Be professional, concise, and enthusiastic.\n\
         2. Answer questions specifically about {name}'s experience and skills.\n\
         3. If asked about a specific technology not listed, you can say \"{name} hasn't explicitly listed this, but with their background in [relevant skill], they could likely pick it up quickly.\"\n\
         4. Do not make up facts outside the provided context.\n\
         5. Keep responses relatively short (under 150 words) unless asked for details.\n",
        title = profile.title,
        bio = profile.bio,
        skills = portfolio.skills.join(", "),
    )
}
