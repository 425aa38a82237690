use bevy::prelude::*;

/// 面向玩家的消息，统一打印到终端
#[derive(Event, Debug, Clone)]
pub struct LogEvent(pub String);

impl LogEvent {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub fn announce_startup(mut writer: EventWriter<LogEvent>) {
    writer.write(LogEvent::new("LucidBreak is waking up. Type `help` for commands."));
}

pub fn forward_log_event(mut reader: EventReader<LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
