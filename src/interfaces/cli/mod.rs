//! 命令行界面
//!
//! 一次调用即一次会话：加载配置与台账，执行一个命令，修改类命令成功后写回台账。

pub mod args;
pub mod render;

use log::debug;
use serde::Serialize;
use std::path::PathBuf;

pub use args::Cli;
use args::{Commands, DeviceAction, ExportArgs, MaintenanceAction, ReportAction, SettingsAction};

use crate::app_state::AppState;
use crate::commands::{self, CommandResponse};
use crate::commands::device_management::{DeleteDeviceRequest, EditDeviceRequest, SearchDevicesRequest};
use crate::commands::maintenance::{LogMaintenanceRequest, ScheduleRequest};
use crate::commands::settings::{IntervalRequest, NotificationRequest};
use crate::domain::device_filter::{DeviceFilter, ScheduleQuery};
use crate::log_config_warning;
use crate::logging::init_logging;
use crate::models::{AddDeviceRequest, DeviceUpdate, MaintenanceLogEntry};
use crate::services::infrastructure::persistence::ExcelDeviceRepository;
use crate::utils::config::ConfigManager;
use crate::utils::error::{AppError, AppResult};
use crate::utils::time_utils::{Clock, FixedClock, SystemClock};

/// 输出命令结果
fn emit<T: Serialize>(json: bool, response: &CommandResponse<T>, render: impl Fn(&T) -> String) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }
    println!("{}", response.message);
    if let Some(data) = &response.data {
        print!("{}", render(data));
    }
    Ok(())
}

fn export_dir(state: &AppState, export: ExportArgs) -> Option<PathBuf> {
    export
        .export
        .then(|| export.out_dir.unwrap_or_else(|| state.config().persistence_config.export_dir.clone()))
}

/// 加载配置、初始化日志并打开台账
pub fn open_state(cli: &Cli) -> AppResult<AppState> {
    let mut config_manager = ConfigManager::new(cli.config.clone());
    config_manager.load()?;
    config_manager.validate_config()?;

    init_logging(&config_manager.get_config().logging_config)
        .map_err(|e| AppError::configuration_error(format!("初始化日志失败: {}", e)))?;
    if !config_manager.config_file_path().exists() {
        log_config_warning!("配置文件 {} 不存在，使用默认配置", config_manager.config_file_path().display());
    }

    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| config_manager.get_config().persistence_config.data_file.clone());
    let clock: Box<dyn Clock> = match cli.today {
        Some(date) => Box::new(FixedClock::at_date(date)),
        None => Box::new(SystemClock),
    };
    debug!("台账文件: {}", data_file.display());

    AppState::load(config_manager, Box::new(ExcelDeviceRepository::new(data_file)), clock)
}

/// 执行一次命令行调用
pub fn run(cli: Cli) -> AppResult<()> {
    let mut state = open_state(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Dashboard { filter, all_statuses } => {
            let mut filter = filter.into_filter();
            if filter.statuses.is_empty() && !all_statuses {
                filter.statuses = DeviceFilter::dashboard_default().statuses;
            }
            let response = commands::show_dashboard(&state, filter)?;
            emit(json, &response, render::dashboard)
        }

        Commands::Devices { action } => match action {
            DeviceAction::Search { term, center, export } => {
                let request = SearchDevicesRequest {
                    term,
                    center,
                    export_dir: export_dir(&state, export),
                };
                let response = commands::search_devices(&state, request)?;
                emit(json, &response, render::device_list)
            }
            DeviceAction::Add {
                center,
                name,
                department,
                manufacturer,
                model,
                serial,
                installed,
                status,
                interval,
                priority,
                notes,
            } => {
                let request = AddDeviceRequest {
                    center,
                    equipment_name: name,
                    department,
                    manufacturer,
                    model,
                    serial_no: serial,
                    installation_date: installed,
                    device_status: status,
                    maintenance_interval_days: interval,
                    priority,
                    notes,
                };
                let response = commands::add_device(&mut state, request)?;
                emit(json, &response, render::device_change)
            }
            DeviceAction::Edit {
                asset_id,
                name,
                manufacturer,
                model,
                serial,
                department,
                status,
                priority,
                interval,
                notes,
            } => {
                let update = DeviceUpdate {
                    equipment_name: name,
                    manufacturer,
                    model,
                    serial_no: serial,
                    department,
                    device_status: status,
                    priority,
                    maintenance_interval_days: interval,
                    notes,
                };
                let response = commands::edit_device(&mut state, EditDeviceRequest { asset_id, update })?;
                emit(json, &response, render::device_change)
            }
            DeviceAction::Delete { asset_id, yes } => {
                let request = DeleteDeviceRequest { asset_id, confirmed: yes };
                let response = commands::delete_device(&mut state, request)?;
                emit(json, &response, render::device_change)
            }
        },

        Commands::Maintenance { action } => match action {
            MaintenanceAction::Schedule { window, priorities, all_priorities, center, export } => {
                let mut query = ScheduleQuery { window, center, ..Default::default() };
                if all_priorities {
                    query.priorities.clear();
                } else if !priorities.is_empty() {
                    query.priorities = priorities;
                }
                let request = ScheduleRequest { query, export_dir: export_dir(&state, export) };
                let response = commands::maintenance_schedule(&state, request)?;
                emit(json, &response, render::schedule)
            }
            MaintenanceAction::Log {
                asset_id,
                date,
                maintenance_type,
                technician,
                notes,
                parts,
                status_after,
                interval,
            } => {
                let entry = MaintenanceLogEntry {
                    maintenance_date: date,
                    maintenance_type,
                    technician,
                    notes,
                    parts_replaced: parts,
                    device_status_after: status_after,
                    next_interval_days: interval,
                };
                let response = commands::log_maintenance(&mut state, LogMaintenanceRequest { asset_id, entry })?;
                emit(json, &response, render::device_change)
            }
            MaintenanceAction::Stats => {
                let response = commands::maintenance_statistics(&state)?;
                emit(json, &response, render::maintenance_statistics)
            }
        },

        Commands::Reports { action } => match action {
            ReportAction::Comprehensive { export } => {
                let dir = export_dir(&state, export);
                let response = commands::comprehensive_report(&state, dir)?;
                emit(json, &response, render::comprehensive)
            }
            ReportAction::Center { center, export } => {
                let dir = export_dir(&state, export);
                let response = commands::center_report(&state, &center, dir)?;
                emit(json, &response, render::center)
            }
            ReportAction::Custom { filter, export } => {
                let dir = export_dir(&state, export);
                let response = commands::custom_report(&state, filter.into_filter(), dir)?;
                emit(json, &response, render::custom)
            }
        },

        Commands::Settings { action } => match action {
            SettingsAction::Interval { equipment_name, days } => {
                let request = IntervalRequest { equipment_name, interval_days: days };
                let response = commands::interval_settings(&mut state, request)?;
                emit(json, &response, render::interval)
            }
            SettingsAction::Notifications { days_before, overdue, email } => {
                let request = NotificationRequest {
                    notify_days_before: days_before,
                    notify_overdue: overdue,
                    notify_email: email,
                };
                let response = commands::notification_settings(&mut state, request)?;
                emit(json, &response, render::notifications)
            }
            SettingsAction::Backup { dir } => {
                let response = commands::create_backup(&state, dir)?;
                emit(json, &response, |path| format!("{}\n", path.display()))
            }
            SettingsAction::Restore { file } => {
                let response = commands::restore_backup(&mut state, &file)?;
                emit(json, &response, render::restore)
            }
        },
    }
}
