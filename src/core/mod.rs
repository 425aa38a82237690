use bevy::prelude::*;

pub mod config;
pub mod events;
pub mod session;
pub mod states;

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        app.init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .init_resource::<config::GameConfig>()
            .init_resource::<session::Session>()
            .add_systems(PreStartup, config::load_config)
            .add_systems(Startup, events::announce_startup)
            .add_systems(Update, events::forward_log_event);
    }
}
