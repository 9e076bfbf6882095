//! # 作品集内容服务（Content Store）
//!
//! 加载并校验只读的作品集数据：
//! - 默认使用编译期内置的 `data/portfolio.yaml`
//! - 设置中指定了 `contentPath` 时改为读取该 YAML 文件
//!
//! 数据加载后不可变，内部用 `Arc` 持有，克隆 `ContentStore` 不复制内容。

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::models::portfolio::{Portfolio, Profile, Project};

/// 编译期内置的作品集内容
const EMBEDDED_PORTFOLIO: &str = include_str!("../../data/portfolio.yaml");

/// 只读内容存储
#[derive(Debug, Clone)]
pub struct ContentStore {
    portfolio: Arc<Portfolio>,
}

impl ContentStore {
    /// 从 YAML 文本解析并校验内容
    ///
    /// # 错误
    /// YAML 解析失败，或项目 / 经历列表中存在重复 `id` 时返回错误
    pub fn from_yaml(text: &str) -> Result<Self, String> {
        let portfolio: Portfolio =
            serde_yaml::from_str(text).map_err(|e| format!("解析作品集内容失败: {}", e))?;
        Self::from_portfolio(portfolio)
    }

    /// 校验并包装一份已构造好的作品集
    pub fn from_portfolio(portfolio: Portfolio) -> Result<Self, String> {
        ensure_unique("项目", portfolio.projects.iter().map(|p| p.id.as_str()))?;
        ensure_unique("经历", portfolio.experience.iter().map(|e| e.id.as_str()))?;
        Ok(Self {
            portfolio: Arc::new(portfolio),
        })
    }

    /// 内置的作品集内容
    pub fn embedded() -> Result<Self, String> {
        Self::from_yaml(EMBEDDED_PORTFOLIO)
    }

    /// 加载作品集内容
    ///
    /// # 参数
    /// - `override_path` - 替换内容的 YAML 文件路径；为 `None` 时使用内置内容
    ///
    /// # 错误
    /// 文件无法读取或内容校验失败时返回错误
    pub async fn load(override_path: Option<&Path>) -> Result<Self, String> {
        let Some(path) = override_path else {
            return Self::embedded();
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("读取作品集内容文件失败: {}", e))?;
        let store = Self::from_yaml(&text)?;
        log::info!(
            "已加载作品集内容: {} ({} 个项目)",
            path.display(),
            store.portfolio.projects.len()
        );
        Ok(store)
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn profile(&self) -> &Profile {
        &self.portfolio.profile
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.portfolio.projects.iter().find(|p| p.id == id)
    }

    /// 名字的第一个词，用于欢迎语和聊天开场白
    pub fn first_name(&self) -> &str {
        let name = self.portfolio.profile.name.trim();
        name.split_whitespace().next().unwrap_or(name)
    }

    /// 界面上允许打开的全部外部链接（社交链接 + 项目仓库 / 演示地址）
    pub fn links(&self) -> Vec<&str> {
        let social = &self.portfolio.profile.social;
        let mut links = vec![
            social.github.as_str(),
            social.linkedin.as_str(),
            social.email.as_str(),
        ];
        for project in &self.portfolio.projects {
            links.extend(project.repo_url.as_deref());
            links.extend(project.demo_url.as_deref());
        }
        links
    }
}

/// 校验标识符在列表内唯一
fn ensure_unique<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> Result<(), String> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(format!("{}标识符重复: '{}'", kind, id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_content_is_valid() {
        let store = ContentStore::embedded().expect("内置内容应当有效");
        let portfolio = store.portfolio();
        assert_eq!(portfolio.profile.name, "Nikhilesh Pal");
        assert_eq!(portfolio.projects.len(), 7);
        assert_eq!(portfolio.experience.len(), 1);
        assert_eq!(store.first_name(), "Nikhilesh");
    }

    #[test]
    fn test_projects_keep_authoring_order() {
        let store = ContentStore::embedded().unwrap();
        let ids: Vec<&str> = store
            .portfolio()
            .projects
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, ["new-1", "new-2", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_duplicate_project_id_is_rejected() {
        let yaml = r#"
profile:
  name: "A B"
  title: "T"
  avatarUrl: "u"
  bio: "b"
  social: { github: "g", linkedin: "l", email: "e" }
skills: []
projects:
  - { id: "1", title: "x", description: "d", techStack: [], imageUrl: "i" }
  - { id: "1", title: "y", description: "d", techStack: [], imageUrl: "i" }
experience: []
"#;
        let err = ContentStore::from_yaml(yaml).unwrap_err();
        assert!(err.contains("'1'"), "{}", err);
    }

    #[test]
    fn test_same_id_across_lists_is_allowed() {
        // 项目和经历各自独立校验（内置内容里两者都有 id "2"）
        let store = ContentStore::embedded().unwrap();
        assert!(store.project("2").is_some());
        assert!(store.portfolio().experience.iter().any(|e| e.id == "2"));
    }

    #[test]
    fn test_links_cover_social_and_repos() {
        let store = ContentStore::embedded().unwrap();
        let links = store.links();
        assert!(links.contains(&"https://github.com/Nikhileshpal145"));
        assert!(links.contains(&"https://github.com/Nikhileshpal145/Web-Scraper"));
        assert_eq!(links.len(), 3 + 7);
    }

    #[tokio::test]
    async fn test_load_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.yaml");
        let yaml = EMBEDDED_PORTFOLIO.replace("Nikhilesh Pal", "Ada Lovelace");
        std::fs::write(&path, yaml).unwrap();

        let store = ContentStore::load(Some(&path)).await.unwrap();
        assert_eq!(store.profile().name, "Ada Lovelace");
        assert_eq!(store.first_name(), "Ada");
    }

    #[tokio::test]
    async fn test_load_missing_override_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentStore::load(Some(&dir.path().join("nope.yaml")))
            .await
            .unwrap_err();
        assert!(err.starts_with("读取作品集内容文件失败"));
    }
}
