// ==========================================
// 仓库拣料核对系统 - 命令行入口
// ==========================================
// 用途: 加载当前订单清单（合并本地草稿）并输出进度摘要
// 约束: 只读，不修改会话
// ==========================================

use smartpick::app::{get_default_db_path, AppState};

#[tokio::main]
async fn main() {
    // 初始化日志系统
    smartpick::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", smartpick::APP_NAME);
    tracing::info!("系统版本: {}", smartpick::VERSION);
    tracing::info!("==================================================");

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let app_state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("无法初始化AppState: {}", e);
            std::process::exit(1);
        }
    };

    match app_state.config_manager.get_config_snapshot() {
        Ok(snapshot) => tracing::debug!(config = %snapshot, "生效配置"),
        Err(e) => tracing::warn!("读取配置快照失败: {}", e),
    }

    let snapshot = match app_state.picking_api.load_session().await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{}", e.user_message());
            std::process::exit(2);
        }
    };

    tracing::info!(
        phase = %snapshot.phase,
        opd = %snapshot.header.global_opd,
        multiplier = %snapshot.header.multiplier,
        rows = snapshot.row_count,
        "会话已加载"
    );

    for part in snapshot.parts.iter().filter(|p| !p.is_done) {
        tracing::info!(
            code = %part.display_code,
            zone = %part.zone,
            found = part.found_total,
            target = part.effective_target,
            "待拣零件"
        );
    }

    for kit in snapshot.kits.iter().filter(|k| !k.is_done) {
        tracing::info!(
            code = %kit.display_code,
            found = kit.found,
            target = kit.effective_target,
            "待拣套件"
        );
    }

    tracing::info!(
        found = snapshot.progress.total_found,
        target = snapshot.progress.total_target,
        "进度: {}%",
        snapshot.progress.percentage
    );
}
