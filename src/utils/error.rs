use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用程序统一错误类型
/// 所有错误最终都会以用户可读的消息呈现，进程不会因此退出
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AppError {
    /// 通用错误，包含错误消息
    #[error("通用错误: {message}")]
    Generic { message: String },

    /// 输入/输出错误
    #[error("IO错误: {message} (Kind: {kind})")]
    IoError { message: String, kind: String },

    /// 数据持久化相关错误（保存台账文件失败等）
    ///
    /// 保存失败时内存中的台账保持不变，用户可以重试
    #[error("持久化错误: {message}")]
    PersistenceError { message: String },

    /// 配置相关错误
    #[error("配置错误: {message}")]
    ConfigurationError { message: String },

    /// 验证错误（表单必填项缺失、维护周期越界等）
    #[error("验证错误: {message}")]
    ValidationError { message: String },

    /// 资源未找到错误
    #[error("资源未找到: {resource_type} - {message}")]
    NotFoundError {
        resource_type: String,
        message: String,
    },

    /// 业务逻辑错误
    #[error("业务逻辑错误: {message}")]
    BusinessLogicError { message: String },

    /// JSON序列化/反序列化错误
    #[error("JSON序列化/反序列化错误: {message}")]
    JsonError { message: String },

    /// Excel读写错误
    #[error("Excel错误: {message}")]
    ExcelError { message: String },

    /// 报告生成错误
    #[error("报告生成错误: {message}")]
    ReportGenerationError { message: String },
}

impl AppError {
    /// 创建通用错误
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// 创建IO错误
    pub fn io_error(message: impl Into<String>, kind_str: impl Into<String>) -> Self {
        Self::IoError {
            message: message.into(),
            kind: kind_str.into(),
        }
    }

    /// 创建持久化错误
    pub fn persistence_error(message: impl Into<String>) -> Self {
        Self::PersistenceError {
            message: message.into(),
        }
    }

    /// 创建配置错误
    pub fn configuration_error(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// 创建验证错误
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found_error(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    /// 创建业务逻辑错误
    pub fn business_logic_error(message: impl Into<String>) -> Self {
        Self::BusinessLogicError {
            message: message.into(),
        }
    }

    /// 创建JSON序列化错误
    pub fn json_error(message: impl Into<String>) -> Self {
        Self::JsonError {
            message: message.into(),
        }
    }

    /// 创建Excel错误
    pub fn excel_error(message: impl Into<String>) -> Self {
        Self::ExcelError {
            message: message.into(),
        }
    }

    /// 创建报告生成错误
    pub fn report_generation_error(message: impl Into<String>) -> Self {
        Self::ReportGenerationError {
            message: message.into(),
        }
    }

    /// 获取错误的简短描述
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Generic { .. } => "GENERIC",
            AppError::IoError { .. } => "IO_ERROR",
            AppError::PersistenceError { .. } => "PERSISTENCE_ERROR",
            AppError::ConfigurationError { .. } => "CONFIGURATION_ERROR",
            AppError::ValidationError { .. } => "VALIDATION_ERROR",
            AppError::NotFoundError { .. } => "NOT_FOUND_ERROR",
            AppError::BusinessLogicError { .. } => "BUSINESS_LOGIC_ERROR",
            AppError::JsonError { .. } => "JSON_ERROR",
            AppError::ExcelError { .. } => "EXCEL_ERROR",
            AppError::ReportGenerationError { .. } => "REPORT_GENERATION_ERROR",
        }
    }
}

/// 标准 I/O 错误到 AppError 的转换
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError { message: err.to_string(), kind: format!("{:?}", err.kind()) }
    }
}

/// serde_json 错误到 AppError 的转换
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::JsonError { message: err.to_string() }
    }
}

/// 字符串错误到 AppError 的转换（通用错误）
impl From<String> for AppError {
    fn from(err_msg: String) -> Self {
        Self::Generic { message: err_msg }
    }
}

/// &str 错误到 AppError 的转换（通用错误）
impl From<&str> for AppError {
    fn from(err_msg: &str) -> Self {
        Self::Generic { message: err_msg.to_string() }
    }
}

/// 应用程序结果类型别名
pub type AppResult<T> = Result<T, AppError>;

/// rust_xlsxwriter 错误到 AppError 的转换
impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::ExcelError { message: format!("Excel error: {}", err) }
    }
}

/// calamine 读取错误到 AppError 的转换
impl From<calamine::XlsxError> for AppError {
    fn from(err: calamine::XlsxError) -> Self {
        AppError::ExcelError { message: format!("无法读取Excel文件: {}", err) }
    }
}

/// config 加载错误到 AppError 的转换
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigurationError { message: err.to_string() }
    }
}

/// 临时文件落盘（重命名）失败的转换
impl From<tempfile::PersistError> for AppError {
    fn from(err: tempfile::PersistError) -> Self {
        AppError::PersistenceError { message: format!("写入台账文件失败: {}", err.error) }
    }
}
