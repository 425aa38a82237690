pub mod catalog;
pub mod loader;
pub mod schema;

use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;

use crate::core::states::AppState;
use crate::dialogue::data::DialogueLibrary;
use crate::level::def::LevelLibrary;
use catalog::ItemCatalog;
use loader::RonLoader;
use schema::{DialogueList, ItemList, LevelList};

pub const ITEMS_PATH: &str = "data/items.ron";
pub const DIALOGUES_PATH: &str = "data/dialogues.ron";
pub const LEVELS_PATH: &str = "data/levels.ron";

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct DataHandles {
    items: Option<Handle<ItemList>>,
    dialogues: Option<Handle<DialogueList>>,
    levels: Option<Handle<LevelList>>,
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemList>()
            .init_asset::<DialogueList>()
            .init_asset::<LevelList>()
            .register_asset_loader(RonLoader::<ItemList>::new(&["items.ron"]))
            .register_asset_loader(RonLoader::<DialogueList>::new(&["dialogues.ron"]))
            .register_asset_loader(RonLoader::<LevelList>::new(&["levels.ron"]))
            .init_resource::<DataHandles>()
            .init_resource::<ItemCatalog>()
            .init_resource::<DialogueLibrary>()
            .init_resource::<LevelLibrary>()
            // Loading 流程
            .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
                next.set(AppState::Loading);
            })
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(mut handles: ResMut<DataHandles>, asset_server: Res<AssetServer>) {
    handles.items = Some(asset_server.load(ITEMS_PATH));
    handles.dialogues = Some(asset_server.load(DIALOGUES_PATH));
    handles.levels = Some(asset_server.load(LEVELS_PATH));
}

/// 三个表都就绪（或失败）后进入游戏；失败的表按空表处理
#[allow(clippy::too_many_arguments)]
fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    handles: Res<DataHandles>,
    asset_server: Res<AssetServer>,
    items: Res<Assets<ItemList>>,
    dialogues: Res<Assets<DialogueList>>,
    levels: Res<Assets<LevelList>>,
    mut catalog: ResMut<ItemCatalog>,
    mut dialogue_library: ResMut<DialogueLibrary>,
    mut level_library: ResMut<LevelLibrary>,
) {
    let (Some(h_items), Some(h_dialogues), Some(h_levels)) =
        (&handles.items, &handles.dialogues, &handles.levels)
    else {
        return;
    };

    let settled = |id: UntypedAssetId, path: &str, loaded: bool| -> bool {
        if loaded {
            return true;
        }
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(id) {
            error!("failed to load {path}: {err}");
            return true;
        }
        false
    };

    let items_ready = settled(h_items.id().untyped(), ITEMS_PATH, items.contains(h_items));
    let dialogues_ready = settled(
        h_dialogues.id().untyped(),
        DIALOGUES_PATH,
        dialogues.contains(h_dialogues),
    );
    let levels_ready = settled(h_levels.id().untyped(), LEVELS_PATH, levels.contains(h_levels));
    if !(items_ready && dialogues_ready && levels_ready) {
        return;
    }

    if let Some(list) = items.get(h_items) {
        *catalog = ItemCatalog::from_entries(list.items.iter().cloned());
    }
    if let Some(list) = dialogues.get(h_dialogues) {
        *dialogue_library = DialogueLibrary::from_dialogues(list.dialogues.iter().cloned());
    }
    if let Some(list) = levels.get(h_levels) {
        *level_library = LevelLibrary::new(list.levels.clone());
    }

    info!(
        "data loaded: {} items, {} dialogues, {} levels",
        catalog.len(),
        dialogue_library.len(),
        level_library.len()
    );
    next.set(AppState::InGame);
}
