//! 文字 CLI：读取 stdin → 解析命令 → 执行并打印

use bevy::app::AppExit;
use bevy::prelude::*;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::core::{events::LogEvent, session::Session, states::AppState};
use crate::data::catalog::ItemCatalog;
use crate::dialogue::data::DialogueLibrary;
use crate::dialogue::events::{ContinueDialogue, SkipDialogue, StartDialogue};
use crate::dialogue::manager::DialogueManager;
use crate::interaction::Interactable;
use crate::inventory::components::Inventory;
use crate::inventory::events::{
    AddItem, DropItem, ListInventoryEvent, SelectSlot, SplitStack, TransferItem,
};
use crate::level::{components::StorageContainer, def::LevelLibrary, LoadLevel};
use crate::player::components::Player;

static CLI_BUFFER: Lazy<Arc<Mutex<VecDeque<String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(VecDeque::new())));

const HELP: &str = "commands:
  help                   show this list
  status                 state, data and session summary
  exit / quit            quit the game
  items [token]          list items, or look one up by name / uuid
  give <name> [count]    put items into the player inventory
  inv                    print the player inventory
  dump                   player inventory as JSON
  select <slot>          select a slot (holds the item)
  drop [slot]            drop the selected (or given) slot into the world
  swap <a> <b>           move / merge / swap two slots
  split <from> <to>      move half of a stack into another slot
  take <slot> [to]       move a stack from the storage in reach to the player
  put <slot> [to]        move a stack from the player to the storage in reach
  talk <id>              start a dialogue
  next                   continue the current dialogue
  skip                   skip the current dialogue
  flags                  list session flags
  flag <name>            set a session flag
  level <n>              load level n";

/// 插件入口
pub struct DebugCliPlugin;
impl Plugin for DebugCliPlugin {
    fn build(&self, app: &mut App) {
        {
            let buffer = CLI_BUFFER.clone();
            std::thread::spawn(move || {
                use std::io::{self, BufRead};
                let stdin = io::stdin();
                for line in stdin.lock().lines().map_while(Result::ok) {
                    let line = line.trim();
                    if !line.is_empty() {
                        push_line(&buffer, line);
                    }
                }
            });
        }
        app
            // 事件：原始输入行、解析后的命令
            .add_event::<CliLine>()
            .add_event::<CliCommand>()
            // 每帧从 buffer 取出所有命令行写入事件
            .add_systems(Update, (read_stdin, parse_cli_lines).chain())
            // 仅在 InGame 处理命令
            .add_systems(
                Update,
                (run_query_commands, run_game_commands)
                    .after(parse_cli_lines)
                    .run_if(in_state(AppState::InGame)),
            );
    }
}

/* ---------------------------- 事件与枚举 ---------------------------- */

/// 终端敲的一整行
#[derive(Event, Debug, Clone)]
pub struct CliLine(pub String);

#[derive(Event, Debug, Clone, PartialEq)]
pub struct CliCommand(pub Command);

/// 我们支持的命令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Status,
    Exit,
    Items(Option<String>), // None=全部；Some(token)=按名称/uuid 查询
    Give { name: String, count: u32 },
    Inventory,
    Dump,
    Select(usize),
    Drop(Option<usize>),
    Swap(usize, usize),
    Split(usize, usize),
    Take { slot: usize, to: Option<usize> },
    Put { slot: usize, to: Option<usize> },
    Talk(String),
    Next,
    Skip,
    Flags,
    SetFlag(String),
    Level(usize),
    /// 命令认识但参数不对，附带用法
    Usage(&'static str),
    Unsupported(String),
}

/* ---------------------------- 读取 stdin ---------------------------- */

fn push_line(buffer: &Mutex<VecDeque<String>>, line: &str) {
    buffer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push_back(line.to_string());
}

fn read_stdin(mut writer: EventWriter<CliLine>) {
    let mut buffer = CLI_BUFFER.lock().unwrap_or_else(PoisonError::into_inner);
    while let Some(line) = buffer.pop_front() {
        writer.write(CliLine(line));
    }
}

fn parse_cli_lines(mut lines: EventReader<CliLine>, mut commands: EventWriter<CliCommand>) {
    for CliLine(input) in lines.read() {
        commands.write(CliCommand(parse_command(input)));
    }
}

/* ---------------------------- 命令执行 ---------------------------- */

/// 只读的查询类命令
#[allow(clippy::too_many_arguments)]
fn run_query_commands(
    mut reader: EventReader<CliCommand>,
    mut app_exit: EventWriter<AppExit>,
    mut log: EventWriter<LogEvent>,
    state: Res<State<AppState>>,
    catalog: Res<ItemCatalog>,
    dialogues: Res<DialogueLibrary>,
    levels: Res<LevelLibrary>,
    session: Res<Session>,
    manager: Res<DialogueManager>,
    player: Query<&Inventory, With<Player>>,
) {
    for CliCommand(cmd) in reader.read() {
        match cmd {
            Command::Help => {
                log.write(LogEvent::new(HELP));
            }

            Command::Status => {
                log.write(LogEvent(format!(
                    "State: {:?}, items: {}, dialogues: {}, levels: {}, current level: {}, collected: {}, dialogue active: {}",
                    state.get(),
                    catalog.len(),
                    dialogues.len(),
                    levels.len(),
                    session.level,
                    session.collected.len(),
                    manager.is_active()
                )));
            }

            Command::Exit => {
                log.write(LogEvent("Bye~".into()));
                app_exit.write(AppExit::Success);
            }

            Command::Items(token) => match token {
                None => {
                    // 全部列出
                    for entry in catalog.iter() {
                        log.write(LogEvent(format!(
                            "{} | {}",
                            uuid_from_name(&entry.name),
                            entry.name
                        )));
                    }
                }
                Some(t) => {
                    let found = catalog.find(t).or_else(|| {
                        catalog
                            .iter()
                            .find(|e| uuid_from_name(&e.name).to_string().eq_ignore_ascii_case(t))
                    });
                    match found {
                        Some(e) => {
                            log.write(LogEvent(format!(
                                "==================================================
UUID     : {}
Name     : {}
Icon     : {}
Tile     : {}
Plantable: {}
Usable   : {}
==================================================",
                                uuid_from_name(&e.name),
                                e.name,
                                e.icon.as_deref().unwrap_or("-"),
                                e.tile.as_deref().unwrap_or("-"),
                                e.plantable,
                                e.usable
                            )));
                        }
                        None => {
                            log.write(LogEvent::new("No matching item"));
                        }
                    }
                }
            },

            Command::Dump => match player.single() {
                Ok(inventory) => match serde_json::to_string_pretty(inventory) {
                    Ok(json) => {
                        log.write(LogEvent(json));
                    }
                    Err(e) => warn!("inventory dump failed: {e}"),
                },
                Err(_) => {
                    log.write(LogEvent::new("No player inventory"));
                }
            },

            Command::Flags => {
                let mut flags: Vec<&str> = session.flags.iter().collect();
                flags.sort_unstable();
                log.write(LogEvent(if flags.is_empty() {
                    "(no flags)".to_string()
                } else {
                    flags.join(", ")
                }));
            }

            Command::Usage(usage) => {
                log.write(LogEvent(format!("usage: {usage}")));
            }

            Command::Unsupported(cmd) => {
                log.write(LogEvent(format!("Unsupported command: {cmd}")));
            }

            _ => {}
        }
    }
}

/// 改变游戏状态的命令，全部转成对应的事件
#[allow(clippy::too_many_arguments)]
pub fn run_game_commands(
    mut reader: EventReader<CliCommand>,
    mut session: ResMut<Session>,
    player: Query<Entity, With<Player>>,
    storage: Query<(Entity, &Interactable), With<StorageContainer>>,
    inventories: Query<&Inventory>,
    mut log: EventWriter<LogEvent>,
    mut ev_give: EventWriter<AddItem>,
    mut ev_list: EventWriter<ListInventoryEvent>,
    mut ev_select: EventWriter<SelectSlot>,
    mut ev_drop: EventWriter<DropItem>,
    mut ev_transfer: EventWriter<TransferItem>,
    mut ev_split: EventWriter<SplitStack>,
    mut ev_talk: EventWriter<StartDialogue>,
    mut ev_next: EventWriter<ContinueDialogue>,
    mut ev_skip: EventWriter<SkipDialogue>,
    mut ev_level: EventWriter<LoadLevel>,
) {
    for CliCommand(cmd) in reader.read() {
        match cmd {
            Command::Give { name, count } => {
                ev_give.write(AddItem::to_player(name.clone(), *count));
            }
            Command::Inventory => {
                ev_list.write(ListInventoryEvent);
            }
            Command::Select(index) => {
                ev_select.write(SelectSlot { index: *index });
            }
            Command::Drop(index) => {
                ev_drop.write(DropItem { index: *index });
            }
            Command::Swap(a, b) => {
                if let Ok(entity) = player.single() {
                    ev_transfer.write(TransferItem {
                        from: entity,
                        from_index: *a,
                        to: entity,
                        to_index: *b,
                    });
                }
            }
            Command::Split(from, to) => {
                if let Ok(entity) = player.single() {
                    ev_split.write(SplitStack {
                        owner: entity,
                        from_index: *from,
                        to_index: *to,
                    });
                }
            }
            Command::Take { slot, to } | Command::Put { slot, to } => {
                let Ok(me) = player.single() else {
                    continue;
                };
                let Some((chest, _)) = storage.iter().find(|(_, i)| i.in_range()) else {
                    log.write(LogEvent::new("No storage in reach"));
                    continue;
                };
                let (from, dest) = if matches!(cmd, Command::Take { .. }) {
                    (chest, me)
                } else {
                    (me, chest)
                };
                let planned = match (inventories.get(from), inventories.get(dest)) {
                    (Ok(src), Ok(dst)) => plan_transfer((from, src), *slot, (dest, dst), *to),
                    _ => Err("No inventory to move between"),
                };
                match planned {
                    Ok(transfer) => {
                        ev_transfer.write(transfer);
                    }
                    Err(msg) => {
                        log.write(LogEvent::new(msg));
                    }
                }
            }
            Command::Talk(id) => {
                ev_talk.write(StartDialogue::by_id(id.clone(), None));
            }
            Command::Next => {
                ev_next.write(ContinueDialogue);
            }
            Command::Skip => {
                ev_skip.write(SkipDialogue);
            }
            Command::SetFlag(flag) => {
                session.flags.set(flag);
            }
            Command::Level(index) => {
                ev_level.write(LoadLevel { index: *index });
            }
            _ => {}
        }
    }
}

/* ---------------------------- 工具函数 ---------------------------- */

/// 两个背包之间的移动；没给目标格时按捡东西的规则找一格
pub fn plan_transfer(
    from: (Entity, &Inventory),
    slot: usize,
    to: (Entity, &Inventory),
    to_index: Option<usize>,
) -> Result<TransferItem, &'static str> {
    let Some(source) = from.1.slot(slot).filter(|s| !s.is_empty()) else {
        return Err("Nothing in that slot");
    };
    let to_index = match to_index {
        Some(i) => i,
        None => to.1.slot_for(source.item_name()).ok_or("No room for it")?,
    };
    Ok(TransferItem {
        from: from.0,
        from_index: slot,
        to: to.0,
        to_index,
    })
}

pub fn parse_command(input: &str) -> Command {
    let mut parts = input.split_whitespace();
    let cmd = parts.next().unwrap_or("").to_lowercase();
    let arg = |s: Option<&str>| s.and_then(|s| s.parse::<usize>().ok());
    match cmd.as_str() {
        "help" | "h" | "?" => Command::Help,
        "status" | "s" => Command::Status,
        "exit" | "quit" => Command::Exit,
        "items" | "item" | "i" => Command::Items(parts.next().map(str::to_string)),
        "give" => match parts.next() {
            Some(name) => {
                let count = parts.next().and_then(|c| c.parse().ok()).unwrap_or(1);
                Command::Give {
                    name: name.to_string(),
                    count,
                }
            }
            None => Command::Usage("give <name> [count]"),
        },
        "inventory" | "inv" => Command::Inventory,
        "dump" => Command::Dump,
        "select" => match arg(parts.next()) {
            Some(i) => Command::Select(i),
            None => Command::Usage("select <slot>"),
        },
        "drop" => match parts.next() {
            None => Command::Drop(None),
            s => match arg(s) {
                Some(i) => Command::Drop(Some(i)),
                None => Command::Usage("drop [slot]"),
            },
        },
        "swap" => match (arg(parts.next()), arg(parts.next())) {
            (Some(a), Some(b)) => Command::Swap(a, b),
            _ => Command::Usage("swap <a> <b>"),
        },
        "split" => match (arg(parts.next()), arg(parts.next())) {
            (Some(a), Some(b)) => Command::Split(a, b),
            _ => Command::Usage("split <from> <to>"),
        },
        "take" | "put" => {
            let slot = arg(parts.next());
            let to = parts.next();
            match (slot, to.map(|t| t.parse::<usize>())) {
                (Some(slot), None) if cmd == "take" => Command::Take { slot, to: None },
                (Some(slot), None) => Command::Put { slot, to: None },
                (Some(slot), Some(Ok(to))) if cmd == "take" => Command::Take { slot, to: Some(to) },
                (Some(slot), Some(Ok(to))) => Command::Put { slot, to: Some(to) },
                _ if cmd == "take" => Command::Usage("take <slot> [to]"),
                _ => Command::Usage("put <slot> [to]"),
            }
        }
        "talk" => match parts.next() {
            Some(id) => Command::Talk(id.to_string()),
            None => Command::Usage("talk <id>"),
        },
        "next" | "n" => Command::Next,
        "skip" => Command::Skip,
        "flags" => Command::Flags,
        "flag" => match parts.next() {
            Some(flag) => Command::SetFlag(flag.to_string()),
            None => Command::Usage("flag <name>"),
        },
        "level" => match arg(parts.next()) {
            Some(i) => Command::Level(i),
            None => Command::Usage("level <n>"),
        },
        other => Command::Unsupported(other.into()),
    }
}

pub fn uuid_from_name(name: &str) -> Uuid {
    // 用固定 namespace + 名称字节生成版本 5 UUID，保证可重复得到同一值
    Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
}
