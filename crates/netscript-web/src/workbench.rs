//! Application state for the single-user workbench.
//!
//! The workbench owns the form configuration, the latest output, and the
//! stores behind history, activity and identity. Handlers only talk to it.

use std::sync::Arc;

use netscript_core::gate::{self, GateDecision, GatedFeature};
use netscript_core::pipeline::GENERATION_ERROR_PREFIX;
use netscript_core::{
    ActivityLog, ChatSession, GitHubUser, HistoryStore, IdentityStore, KeyValueStore, LogAction,
    LogSink, OsTarget, RequestFence, RequestToken, SavedScript, ScriptConfig, ScriptPipeline,
    TextGenerator,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Error shown when no generator could be built.
pub const GENERATOR_MISSING: &str = "Gemini API key is not configured.";

/// Visible state of the workbench.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub config: ScriptConfig,
    pub code: String,
    pub explanation: String,
    pub error: Option<String>,
    pub is_generating: bool,
    /// One-shot message shown above the form.
    pub notice: Option<String>,
}

/// Non-gated form fields.
#[derive(Debug, Clone)]
pub struct ConfigUpdate {
    pub scan_wifi: bool,
    pub scan_bluetooth: bool,
    pub include_mac: bool,
    pub os_target: OsTarget,
    pub scan_timeout: i64,
    pub export_report: bool,
    /// Only applied while port scanning is unlocked and on.
    pub port_range: Option<String>,
}

/// What happened to a Generate action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    Generated,
    Failed(String),
    /// A newer Generate started; this result was dropped.
    Superseded,
}

/// The workbench shared by every handler.
pub struct Workbench {
    session: RwLock<Session>,
    pipeline: Option<ScriptPipeline>,
    chat: ChatSession,
    history: HistoryStore,
    activity: ActivityLog,
    identity: IdentityStore,
    fence: RequestFence,
}

impl Workbench {
    /// Build a workbench over a store.
    ///
    /// Without a generator, Generate reports an error and chat is disabled.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        generator: Option<Arc<dyn TextGenerator>>,
        sink: Option<Arc<dyn LogSink>>,
        explain_prefix_chars: usize,
    ) -> Self {
        let pipeline = generator
            .clone()
            .map(|g| ScriptPipeline::new(g).with_explain_prefix_chars(explain_prefix_chars));
        let activity = match sink {
            Some(sink) => ActivityLog::with_sink(store.clone(), sink),
            None => ActivityLog::new(store.clone()),
        };

        Self {
            session: RwLock::new(Session::default()),
            pipeline,
            chat: ChatSession::start(generator),
            history: HistoryStore::new(store.clone()),
            activity,
            identity: IdentityStore::new(store),
            fence: RequestFence::new(),
        }
    }

    /// Current visible state.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Current state, consuming the one-shot notice.
    pub async fn take_view(&self) -> Session {
        let mut session = self.session.write().await;
        let view = session.clone();
        session.notice = None;
        view
    }

    pub async fn set_notice(&self, notice: impl Into<String>) {
        self.session.write().await.notice = Some(notice.into());
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<GitHubUser> {
        self.identity.load()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn history(&self) -> Vec<SavedScript> {
        self.history.list()
    }

    /// Apply the plain form fields. Port range goes through the gate.
    pub async fn update_config(&self, update: ConfigUpdate) -> ScriptConfig {
        let user = self.user();
        let mut session = self.session.write().await;
        let config = &mut session.config;

        config.scan_wifi = update.scan_wifi;
        config.scan_bluetooth = update.scan_bluetooth;
        config.include_mac = update.include_mac;
        config.os_target = update.os_target;
        config.scan_timeout = ScriptConfig::clamp_timeout(update.scan_timeout);
        config.export_report = update.export_report;

        if let Some(port_range) = update.port_range {
            if port_range.trim() != config.port_range {
                gate::set_port_range(config, &port_range, user.as_ref());
            }
        }

        config.clone()
    }

    /// Flip a gated flag.
    pub async fn toggle(&self, feature: GatedFeature) -> GateDecision {
        let user = self.user();
        let decision = {
            let mut session = self.session.write().await;
            let decision = gate::toggle(&mut session.config, feature, user.as_ref());
            if decision == GateDecision::RequiresDeepScan {
                session.notice = Some("Enable Deep Scan first.".to_string());
            }
            decision
        };

        if let (GatedFeature::DeepScan, GateDecision::Applied(enabled)) = (feature, decision) {
            self.activity.record(
                LogAction::DeepScanToggle,
                format!("Deep Scan set to {}", enabled),
                user.as_ref(),
            );
        }

        decision
    }

    /// Store a verified user and record the login.
    pub async fn sign_in(&self, user: GitHubUser) {
        info!(login = %user.login, "User signed in");
        self.identity.save(&user);
        self.activity
            .record(LogAction::Login, "User logged in via GitHub", Some(&user));
    }

    /// Record the logout, drop the identity and lock gated options.
    pub async fn sign_out(&self) {
        let user = self.user();
        if let Some(user) = &user {
            self.activity
                .record(LogAction::Logout, "User logged out", Some(user));
        }
        self.identity.clear();
        gate::reset_gated(&mut self.session.write().await.config);
    }

    /// Generate a script for the current configuration, then explain it.
    ///
    /// The run happens on its own task: a caller that goes away does not
    /// abort it, and only the most recent Generate may write its result.
    pub async fn generate(self: &Arc<Self>) -> GenerateOutcome {
        let token = self.fence.begin();
        let workbench = Arc::clone(self);
        let task = tokio::spawn(async move { workbench.run_generation(token).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.finish_failed(token, format!("generation task failed: {}", err), self.user())
                    .await
            }
        }
    }

    async fn run_generation(&self, token: RequestToken) -> GenerateOutcome {
        let user = self.user();

        let config = {
            let mut session = self.session.write().await;
            session.is_generating = true;
            session.error = None;
            session.code.clear();
            session.explanation.clear();
            session.config.clone()
        };

        self.activity.record(
            LogAction::GenerateScript,
            config.targets_summary(),
            user.as_ref(),
        );

        let Some(pipeline) = &self.pipeline else {
            return self.finish_failed(token, GENERATOR_MISSING.to_string(), user).await;
        };

        let generation = pipeline.generate_script(&config).await;
        if !self.fence.is_current(token) {
            return GenerateOutcome::Superseded;
        }

        if let Some(reason) = generation.failure.clone() {
            self.session.write().await.code = generation.code;
            return self.finish_failed(token, reason, user).await;
        }

        self.session.write().await.code = generation.code.clone();

        let explanation = pipeline.explain_script(&generation.code).await;
        if !self.fence.is_current(token) {
            return GenerateOutcome::Superseded;
        }

        let mut session = self.session.write().await;
        session.explanation = explanation;
        session.is_generating = false;
        GenerateOutcome::Generated
    }

    async fn finish_failed(
        &self,
        token: RequestToken,
        reason: String,
        user: Option<GitHubUser>,
    ) -> GenerateOutcome {
        if !self.fence.is_current(token) {
            return GenerateOutcome::Superseded;
        }
        warn!(reason = %reason, "Generation failed");
        {
            let mut session = self.session.write().await;
            session.error = Some(reason.clone());
            session.is_generating = false;
        }
        self.activity.record(
            LogAction::Error,
            format!("Generation failed: {}", reason),
            user.as_ref(),
        );
        GenerateOutcome::Failed(reason)
    }

    /// Save the current output. Nothing is saved without a real script.
    pub async fn save(&self) -> Option<SavedScript> {
        let session = self.session.read().await;
        if session.code.is_empty()
            || session.code.starts_with(GENERATION_ERROR_PREFIX)
            || session.is_generating
        {
            return None;
        }
        Some(
            self.history
                .save(&session.code, &session.explanation, &session.config),
        )
    }

    /// Restore a saved script into the form. Returns false for unknown ids.
    pub async fn load(&self, id: &str) -> bool {
        let Some(saved) = self.history.get(id) else {
            return false;
        };

        let mut session = self.session.write().await;
        session.config = saved.config;
        session.code = saved.code;
        session.explanation = saved.explanation;
        session.error = None;
        if self.user().is_none() {
            gate::reset_gated(&mut session.config);
        }
        true
    }

    pub fn delete(&self, id: &str) -> Vec<SavedScript> {
        self.history.delete(id)
    }

    pub fn clear_history(&self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_brain::{DelayedGenerator, FailingGenerator, ScriptedGenerator};
    use netscript_core::MemoryStore;

    fn user() -> GitHubUser {
        GitHubUser {
            login: "octocat".to_string(),
            name: None,
            avatar_url: "https://avatars.example/o.png".to_string(),
            html_url: "https://github.com/octocat".to_string(),
            bio: None,
        }
    }

    fn workbench(generator: Option<Arc<dyn TextGenerator>>) -> Arc<Workbench> {
        Arc::new(Workbench::new(
            Arc::new(MemoryStore::new()),
            generator,
            None,
            3000,
        ))
    }

    fn actions(workbench: &Workbench) -> Vec<LogAction> {
        workbench
            .activity()
            .entries()
            .iter()
            .map(|e| e.action)
            .collect()
    }

    #[tokio::test]
    async fn test_generate_fills_code_and_explanation() {
        let workbench = workbench(Some(Arc::new(ScriptedGenerator::with_responses([
            "```python\nprint('scan')\n```",
            "Prints scan.",
        ]))));

        assert_eq!(workbench.generate().await, GenerateOutcome::Generated);

        let session = workbench.snapshot().await;
        assert_eq!(session.code, "print('scan')");
        assert_eq!(session.explanation, "Prints scan.");
        assert!(session.error.is_none());
        assert!(!session.is_generating);

        let entries = workbench.activity().entries();
        assert_eq!(entries[0].action, LogAction::GenerateScript);
        assert_eq!(
            entries[0].details,
            "Targets: WiFi=true, BLE=true, Online=false, Deep=false"
        );
    }

    #[tokio::test]
    async fn test_generate_failure_records_error() {
        let workbench = workbench(Some(Arc::new(FailingGenerator::network("offline"))));

        let outcome = workbench.generate().await;
        assert_eq!(
            outcome,
            GenerateOutcome::Failed("network error: offline".to_string())
        );

        let session = workbench.snapshot().await;
        assert!(session.code.starts_with(GENERATION_ERROR_PREFIX));
        assert!(session.explanation.is_empty());
        assert_eq!(session.error.as_deref(), Some("network error: offline"));
        assert_eq!(
            actions(&workbench),
            vec![LogAction::Error, LogAction::GenerateScript]
        );
    }

    #[tokio::test]
    async fn test_generate_without_generator() {
        let workbench = workbench(None);

        let outcome = workbench.generate().await;
        assert_eq!(outcome, GenerateOutcome::Failed(GENERATOR_MISSING.to_string()));
        assert!(!workbench.chat().is_active());
    }

    #[tokio::test]
    async fn test_stale_generation_is_dropped() {
        let slow = DelayedGenerator::with_millis(
            ScriptedGenerator::with_responses(["old", "old explained", "new", "new explained"]),
            100,
        );
        let workbench = workbench(Some(Arc::new(slow)));

        let first = {
            let workbench = workbench.clone();
            tokio::spawn(async move { workbench.generate().await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        let second = workbench.generate().await;

        assert_eq!(first.await.unwrap(), GenerateOutcome::Superseded);
        assert_eq!(second, GenerateOutcome::Generated);
    }

    #[tokio::test]
    async fn test_dropped_request_still_finishes() {
        let slow = DelayedGenerator::with_millis(
            ScriptedGenerator::with_responses(["print('late')", "explained"]),
            100,
        );
        let workbench = workbench(Some(Arc::new(slow)));

        let dropped =
            tokio::time::timeout(std::time::Duration::from_millis(20), workbench.generate()).await;
        assert!(dropped.is_err());
        assert!(workbench.snapshot().await.is_generating);

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        let session = workbench.snapshot().await;
        assert!(!session.is_generating);
        assert_eq!(session.code, "print('late')");
        assert_eq!(session.explanation, "explained");
        assert!(workbench.save().await.is_some());
    }

    #[tokio::test]
    async fn test_toggle_requires_login() {
        let workbench = workbench(None);

        assert_eq!(
            workbench.toggle(GatedFeature::DeepScan).await,
            GateDecision::LoginRequired
        );
        assert!(!workbench.snapshot().await.config.deep_scan);
        assert!(workbench.activity().entries().is_empty());
    }

    #[tokio::test]
    async fn test_deep_scan_toggle_is_logged() {
        let workbench = workbench(None);
        workbench.sign_in(user()).await;

        assert_eq!(
            workbench.toggle(GatedFeature::VulnScan).await,
            GateDecision::RequiresDeepScan
        );
        assert_eq!(
            workbench.take_view().await.notice.as_deref(),
            Some("Enable Deep Scan first.")
        );
        assert!(workbench.snapshot().await.notice.is_none());

        assert_eq!(
            workbench.toggle(GatedFeature::DeepScan).await,
            GateDecision::Applied(true)
        );
        assert_eq!(
            workbench.toggle(GatedFeature::VulnScan).await,
            GateDecision::Applied(true)
        );

        let entries = workbench.activity().entries();
        assert_eq!(entries[0].action, LogAction::DeepScanToggle);
        assert_eq!(entries[0].details, "Deep Scan set to true");
        assert_eq!(entries[0].user.as_deref(), Some("octocat"));
    }

    #[tokio::test]
    async fn test_sign_out_resets_gated_options() {
        let workbench = workbench(None);
        workbench.sign_in(user()).await;
        workbench.toggle(GatedFeature::DeepScan).await;
        workbench.toggle(GatedFeature::ScanPorts).await;

        workbench.sign_out().await;

        let config = workbench.snapshot().await.config;
        assert!(!config.deep_scan);
        assert!(!config.scan_ports);
        assert!(workbench.user().is_none());
        assert_eq!(actions(&workbench)[0], LogAction::Logout);
    }

    #[tokio::test]
    async fn test_update_config_clamps_and_gates_ports() {
        let workbench = workbench(None);
        let update = ConfigUpdate {
            scan_wifi: false,
            scan_bluetooth: true,
            include_mac: false,
            os_target: OsTarget::Linux,
            scan_timeout: 500,
            export_report: true,
            port_range: Some("1-1024".to_string()),
        };

        let config = workbench.update_config(update.clone()).await;
        assert!(!config.scan_wifi);
        assert_eq!(config.os_target, OsTarget::Linux);
        assert_eq!(config.scan_timeout, 60);
        assert!(config.export_report);
        assert_eq!(config.port_range, "22,80,443,445,3389");

        workbench.sign_in(user()).await;
        workbench.toggle(GatedFeature::ScanPorts).await;
        let config = workbench.update_config(update).await;
        assert_eq!(config.port_range, "1-1024");
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let workbench = workbench(Some(Arc::new(ScriptedGenerator::with_responses([
            "print(1)",
            "explained",
        ]))));

        assert!(workbench.save().await.is_none());

        workbench.generate().await;
        let saved = workbench.save().await.unwrap();
        assert_eq!(workbench.history().len(), 1);

        workbench.generate().await;
        assert!(workbench.snapshot().await.error.is_some());

        assert!(workbench.load(&saved.id).await);
        let session = workbench.snapshot().await;
        assert_eq!(session.code, "print(1)");
        assert_eq!(session.explanation, "explained");
        assert!(session.error.is_none());

        assert!(!workbench.load("missing").await);
        assert!(workbench.delete(&saved.id).is_empty());
    }

    #[tokio::test]
    async fn test_failed_output_is_not_saved() {
        let workbench = workbench(Some(Arc::new(FailingGenerator::provider(500, "boom"))));
        workbench.generate().await;

        assert!(workbench.save().await.is_none());
        assert!(workbench.history().is_empty());
    }
}
