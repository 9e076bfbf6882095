//! # 应用全局状态
//!
//! 通过 Tauri 的 `manage()` 注册，所有 command 通过 `State<AppState>` 访问。
//! 内容库和聊天桥接在启动后只读，其余可变部分各自加锁：
//! - 对话记录用 `RwLock`，流式回复期间每个片段短暂加写锁
//! - 开机状态机、场景、合成器只有写操作，用 `Mutex`
//! - 外壳和图片回退状态读多写少，用 `RwLock`
//!
//! 锁守卫只在单条语句内持有，不跨越 `.await`。

use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use serde::Serialize;

use crate::models::boot::{BootEvent, BootSnapshot};
use crate::models::chat::{ChatEvent, ChatMessage};
use crate::models::scene::{FrameInput, SceneSnapshot};
use crate::models::settings::AppSettings;
use crate::models::shell::{Panel, ShellView};
use crate::services::assets::{ImageRegistry, ImageSlot};
use crate::services::audio::{KeystrokeSynth, KeystrokeTone};
use crate::services::boot::{BootDriver, BootSequence, RandomJitter};
use crate::services::chat::gemini::GeminiBackend;
use crate::services::chat::transcript::Transcript;
use crate::services::chat::{ChatBackend, ChatBridge};
use crate::services::content::ContentStore;
use crate::services::export::{self, ExportFormat};
use crate::services::scene::SceneState;
use crate::services::settings;
use crate::services::shell::ShellState;
use crate::utils::clock::Clock;
use crate::utils::math::Vec3;

/// 导出文档的标题
pub const TRANSCRIPT_TITLE: &str = "NEURAL_OS TERMINAL";

/// 一帧场景更新的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    pub snapshot: SceneSnapshot,
    /// 本帧需要播放的按键音
    pub tones: Vec<KeystrokeTone>,
}

pub struct AppState {
    content: ContentStore,
    bridge: ChatBridge,
    transcript: RwLock<Transcript>,
    boot: Mutex<BootSequence>,
    scene: Mutex<SceneState>,
    shell: RwLock<ShellState>,
    images: RwLock<ImageRegistry>,
    synth: Mutex<KeystrokeSynth>,
}

impl AppState {
    /// 以系统熵初始化所有随机源
    ///
    /// # 参数
    /// - `content` - 已校验的作品集内容
    /// - `backend` - 聊天后端（生产环境为 Gemini）
    /// - `settings` - 应用设置（取其中的采样温度）
    pub fn new(content: ContentStore, backend: Arc<dyn ChatBackend>, settings: &AppSettings) -> Self {
        let bridge = ChatBridge::new(backend, content.portfolio(), settings.temperature);
        let boot = BootSequence::new(content.first_name(), RandomJitter::from_entropy());
        Self::from_parts(
            content,
            bridge,
            boot,
            SceneState::from_entropy(),
            KeystrokeSynth::new(),
        )
    }

    /// 应用启动时的完整初始化：读取设置、加载内容、读取 API Key
    ///
    /// # 错误
    /// 设置文件无效或作品集内容无法加载时返回错误，应用不应继续启动
    pub async fn bootstrap() -> Result<Self, String> {
        let settings = settings::load_settings().await?;
        let content_path = settings.content_path.as_deref().map(std::path::Path::new);
        let content = ContentStore::load(content_path).await?;
        let backend = GeminiBackend::new(settings::api_key_from_env(), &settings);
        log::info!(
            "应用状态初始化完成: 模型 {}, {} 个项目",
            settings.model,
            content.portfolio().projects.len()
        );
        Ok(Self::new(content, Arc::new(backend), &settings))
    }

    /// 由已构造好的各部分组装（测试中注入固定随机源）
    pub fn from_parts(
        content: ContentStore,
        bridge: ChatBridge,
        boot: BootSequence,
        scene: SceneState,
        synth: KeystrokeSynth,
    ) -> Self {
        let transcript = Transcript::new(content.first_name());
        Self {
            content,
            bridge,
            transcript: RwLock::new(transcript),
            boot: Mutex::new(boot),
            scene: Mutex::new(scene),
            shell: RwLock::new(ShellState::new()),
            images: RwLock::new(ImageRegistry::new()),
            synth: Mutex::new(synth),
        }
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    // ============ 开机序列 ============

    /// 按下电源键（只在 standby 时生效）
    pub fn power_on(&self) -> Result<Vec<BootEvent>, String> {
        let events = self
            .boot
            .lock()
            .map_err(|e| format!("获取开机状态锁失败: {}", e))?
            .power_on();
        self.apply_boot_events(&events)?;
        Ok(events)
    }

    /// 将开机状态机推进 `dt`
    pub fn tick_boot(&self, dt: Duration) -> Result<Vec<BootEvent>, String> {
        let events = self
            .boot
            .lock()
            .map_err(|e| format!("获取开机状态锁失败: {}", e))?
            .advance(dt);
        self.apply_boot_events(&events)?;
        Ok(events)
    }

    /// 按时钟推进开机状态机
    pub fn drive_boot<C: Clock>(&self, driver: &mut BootDriver<C>) -> Result<Vec<BootEvent>, String> {
        let events = {
            let mut boot = self
                .boot
                .lock()
                .map_err(|e| format!("获取开机状态锁失败: {}", e))?;
            driver.tick(&mut boot)
        };
        self.apply_boot_events(&events)?;
        Ok(events)
    }

    fn apply_boot_events(&self, events: &[BootEvent]) -> Result<(), String> {
        if events.iter().any(|e| matches!(e, BootEvent::Entered)) {
            self.shell
                .write()
                .map_err(|e| format!("获取界面状态锁失败: {}", e))?
                .enter();
        }
        Ok(())
    }

    pub fn boot_snapshot(&self) -> Result<BootSnapshot, String> {
        Ok(self
            .boot
            .lock()
            .map_err(|e| format!("获取开机状态锁失败: {}", e))?
            .snapshot())
    }

    // ============ 3D 场景 ============

    /// 更新一帧场景
    ///
    /// 机器人动作取自开机状态机，是否已进入主界面取自外壳状态，
    /// 前端传入的 `entered` 字段会被覆盖。
    pub fn advance_scene(&self, input: FrameInput) -> Result<SceneFrame, String> {
        let action = self
            .boot
            .lock()
            .map_err(|e| format!("获取开机状态锁失败: {}", e))?
            .agent();
        let entered = self
            .shell
            .read()
            .map_err(|e| format!("获取界面状态锁失败: {}", e))?
            .is_entered();
        let input = FrameInput { entered, ..input };

        let (output, snapshot) = {
            let mut scene = self
                .scene
                .lock()
                .map_err(|e| format!("获取场景锁失败: {}", e))?;
            let output = scene.update(&input, action);
            (output, scene.snapshot())
        };

        let tones = self
            .synth
            .lock()
            .map_err(|e| format!("获取音效合成器锁失败: {}", e))?
            .tones(output.keystrokes);
        Ok(SceneFrame { snapshot, tones })
    }

    /// 点击地板，机器人 idle 时走过去
    pub fn set_walk_target(&self, point: Vec3) -> Result<bool, String> {
        let action = self
            .boot
            .lock()
            .map_err(|e| format!("获取开机状态锁失败: {}", e))?
            .agent();
        Ok(self
            .scene
            .lock()
            .map_err(|e| format!("获取场景锁失败: {}", e))?
            .set_walk_target(point, action))
    }

    /// 用户按下键盘
    pub fn press_key(&self) -> Result<KeystrokeTone, String> {
        self.scene
            .lock()
            .map_err(|e| format!("获取场景锁失败: {}", e))?
            .press_key();
        Ok(self
            .synth
            .lock()
            .map_err(|e| format!("获取音效合成器锁失败: {}", e))?
            .tone())
    }

    // ============ 主界面 ============

    /// 切换面板，离开的面板的图片回退状态被清除
    pub fn select_panel(&self, panel: Panel) -> Result<bool, String> {
        let left = {
            let mut shell = self
                .shell
                .write()
                .map_err(|e| format!("获取界面状态锁失败: {}", e))?;
            let previous = shell.active();
            shell.select(panel).then_some(previous)
        };

        if let Some(previous) = left {
            self.images
                .write()
                .map_err(|e| format!("获取图片状态锁失败: {}", e))?
                .reset_panel(previous);
        }
        Ok(left.is_some())
    }

    pub fn shell_view(&self) -> Result<Option<ShellView>, String> {
        let shell = self
            .shell
            .read()
            .map_err(|e| format!("获取界面状态锁失败: {}", e))?;
        let images = self
            .images
            .read()
            .map_err(|e| format!("获取图片状态锁失败: {}", e))?;
        let transcript = self
            .transcript
            .read()
            .map_err(|e| format!("获取对话记录锁失败: {}", e))?;
        Ok(shell.render(&self.content, &images, &transcript))
    }

    /// 前端报告图片加载失败
    ///
    /// # 错误
    /// 项目 id 不存在时返回错误
    pub fn report_image_error(&self, slot: ImageSlot) -> Result<bool, String> {
        if let ImageSlot::Project(id) = &slot {
            if self.content.project(id).is_none() {
                return Err(format!("未知的项目: '{}'", id));
            }
        }
        Ok(self
            .images
            .write()
            .map_err(|e| format!("获取图片状态锁失败: {}", e))?
            .report_failure(slot))
    }

    // ============ 终端聊天 ============

    pub fn transcript(&self) -> Result<Vec<ChatMessage>, String> {
        Ok(self
            .transcript
            .read()
            .map_err(|e| format!("获取对话记录锁失败: {}", e))?
            .messages()
            .to_vec())
    }

    pub fn export_transcript(&self, format: ExportFormat) -> Result<String, String> {
        let transcript = self
            .transcript
            .read()
            .map_err(|e| format!("获取对话记录锁失败: {}", e))?;
        Ok(export::export(transcript.messages(), format, TRANSCRIPT_TITLE))
    }

    /// 提交一条用户消息并流式接收回复
    ///
    /// # 参数
    /// - `input` - 用户输入
    /// - `on_event` - 每个聊天事件（开始、片段、结束）的回调
    ///
    /// # 返回值
    /// 结束后的完整回复
    ///
    /// # 错误
    /// 输入为空或上一条回复尚未结束时返回错误，对话记录不变
    pub async fn send_chat(
        &self,
        input: &str,
        on_event: impl FnMut(ChatEvent),
    ) -> Result<ChatMessage, String> {
        self.bridge.relay(&self.transcript, input, on_event).await
    }

    // ============ 外部链接 ============

    /// 校验待打开的链接来自作品集内容
    pub fn resolve_link(&self, url: &str) -> Result<String, String> {
        if self.content.links().contains(&url) {
            Ok(url.to_string())
        } else {
            Err(format!("不允许打开的链接: {}", url))
        }
    }
}
