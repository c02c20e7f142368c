//! Pet Hatchery セーブ/ロード機能。
//!
//! ## 互換性方針
//!
//! セーブデータは `ProgressionState` 全体を1つの JSON ドキュメントにしたもの。
//! ロード時は新規状態の上にフィールド単位でマージする。
//! 旧セーブに無いフィールドはデフォルト値で補完し、クラッシュさせない。
//!
//! - `variant` が無いペットは `normal` として読み込む。
//! - `discovered_species` が無い場合は所持ペットの種族から補完する。
//! - `unlocked_worlds` には常にワールド1を含める。
//!
//! `version` は記録用のみ。古いバージョンでも拒否せずマイグレーションする。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::SaveError;
use super::state::{
    InstanceId, OwnedPet, ProgressionState, SpeciesId, UpgradeId, WorldId, WorldSnapshot,
    HOME_WORLD,
};

/// セーブデータのフォーマットバージョン。
/// フィールド追加時にインクリメントすること。
const SAVE_VERSION: u32 = 1;

/// localStorage のキー。
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "pet_hatchery_save";

#[derive(Serialize, Deserialize)]
struct SaveData {
    #[serde(default)]
    version: u32,
    game: GameSave,
}

/// シリアライズ用のセーブデータ構造体。
/// 孵化セッションやタイマーなどの一時状態は含まない。
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    resource: f64,
    lifetime_resource: f64,
    total_clicks: u64,
    world_click_counts: BTreeMap<WorldId, u64>,
    upgrade_levels: BTreeMap<UpgradeId, u32>,
    double_click_active: bool,

    // 転生データ
    rebirth_level: u64,
    rebirth_count: u64,
    rebirth_upgrade_levels: BTreeMap<UpgradeId, u32>,

    // コレクション
    owned_pets: Vec<OwnedPet>,
    equipped: BTreeSet<InstanceId>,
    /// 旧セーブには存在しない。None なら所持ペットから補完する。
    discovered_species: Option<BTreeSet<SpeciesId>>,
    auto_delete_species: BTreeSet<SpeciesId>,

    // ワールド
    current_world: Option<WorldId>,
    unlocked_worlds: BTreeSet<WorldId>,
    world_snapshots: BTreeMap<WorldId, WorldSnapshot>,

    auto_hatch_enabled: bool,
}

fn extract_save(state: &ProgressionState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            resource: state.resource,
            lifetime_resource: state.lifetime_resource,
            total_clicks: state.total_clicks,
            world_click_counts: state.world_click_counts.clone(),
            upgrade_levels: state.upgrade_levels.clone(),
            double_click_active: state.double_click_active,
            rebirth_level: state.rebirth_level,
            rebirth_count: state.rebirth_count,
            rebirth_upgrade_levels: state.rebirth_upgrade_levels.clone(),
            owned_pets: state.owned_pets.clone(),
            equipped: state.equipped.clone(),
            discovered_species: Some(state.discovered_species.clone()),
            auto_delete_species: state.auto_delete_species.clone(),
            current_world: Some(state.current_world),
            unlocked_worlds: state.unlocked_worlds.clone(),
            world_snapshots: state.world_snapshots.clone(),
            auto_hatch_enabled: state.auto_hatch_enabled,
        },
    }
}

/// 新規状態の上にセーブデータをマージする。
fn apply_save(save: GameSave) -> ProgressionState {
    let mut state = ProgressionState::new();
    state.resource = save.resource;
    state.lifetime_resource = save.lifetime_resource;
    state.total_clicks = save.total_clicks;
    state.world_click_counts = save.world_click_counts;
    state.upgrade_levels = save.upgrade_levels;
    state.double_click_active = save.double_click_active;

    state.rebirth_level = save.rebirth_level;
    state.rebirth_count = save.rebirth_count;
    state.rebirth_upgrade_levels = save.rebirth_upgrade_levels;

    // 所持していないペットは装備できない
    let owned: BTreeSet<InstanceId> = save.owned_pets.iter().map(|p| p.instance_id).collect();
    state.equipped = save.equipped.intersection(&owned).copied().collect();
    state.discovered_species = match save.discovered_species {
        Some(found) => found,
        None => save.owned_pets.iter().map(|p| p.species_id.clone()).collect(),
    };
    state.owned_pets = save.owned_pets;
    state.auto_delete_species = save.auto_delete_species;

    state.unlocked_worlds.extend(save.unlocked_worlds);
    state.unlocked_worlds.insert(HOME_WORLD);
    state.current_world = save
        .current_world
        .filter(|w| state.unlocked_worlds.contains(w))
        .unwrap_or(HOME_WORLD);
    state.world_snapshots = save.world_snapshots;
    state.world_snapshots.remove(&state.current_world);

    state.auto_hatch_enabled = save.auto_hatch_enabled;
    state
}

/// ゲーム状態を JSON 文字列にする。
pub fn to_blob(state: &ProgressionState) -> Result<String, SaveError> {
    serde_json::to_string(&extract_save(state)).map_err(SaveError::Serialize)
}

/// JSON 文字列からゲーム状態を復元する。
pub fn from_blob(json: &str) -> Result<ProgressionState, SaveError> {
    let save_data: SaveData = serde_json::from_str(json).map_err(SaveError::Corrupt)?;
    if save_data.version < SAVE_VERSION {
        tracing::info!(
            saved = save_data.version,
            current = SAVE_VERSION,
            "旧バージョンのセーブデータをマイグレーション"
        );
    }
    Ok(apply_save(save_data.game))
}

/// localStorage にアクセスする。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// セーブ文字列を localStorage に保存する。
/// 失敗時はサイレントに無視（コンソールにログ出力）。
#[cfg(target_arch = "wasm32")]
pub fn save_game(blob: &str) {
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, blob) {
            web_sys::console::warn_1(
                &format!("Pet Hatchery: localStorage への保存に失敗: {e:?}").into(),
            );
        }
    }
}

/// localStorage からゲーム状態を復元する。
/// パースエラーの場合は None を返す（新規ゲームになる）。
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> Option<ProgressionState> {
    let storage = get_storage()?;
    let json = storage.get_item(STORAGE_KEY).ok()??;
    match from_blob(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            web_sys::console::warn_1(
                &format!("Pet Hatchery: セーブデータのパースに失敗（破棄します）: {e}").into(),
            );
            // 壊れたデータを削除
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

/// セーブデータを削除する。
#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
