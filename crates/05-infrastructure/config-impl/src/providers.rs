//! 配置源实现

use config::Source;
use config_abstractions::{priority, PropertySource};
use infrastructure_common::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 内存配置源
#[derive(Debug, Clone)]
pub struct MapPropertySource {
    name: String,
    values: BTreeMap<String, String>,
    priority: i32,
}

impl MapPropertySource {
    /// 创建新的内存配置源
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
            priority: priority::PROGRAMMATIC,
        }
    }

    /// 从键值对创建
    pub fn from_pairs<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut source = Self::new(name);
        for (key, value) in pairs {
            source.insert(key, value);
        }
        source
    }

    /// 设置优先级
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 写入配置值
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for MapPropertySource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// `.properties` 文件配置源
///
/// 支持 `key=value` 与 `key: value` 两种写法，`#` 和 `!` 开头的行为注释，
/// 以第一个分隔符切分，键和值两端空白会被去除。
#[derive(Debug, Clone)]
pub struct PropertiesFileSource {
    file_path: PathBuf,
    name: String,
    values: BTreeMap<String, String>,
    priority: i32,
}

impl PropertiesFileSource {
    /// 加载配置文件，文件不存在或不可读时返回错误
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file_path = path.as_ref().to_path_buf();
        debug!("加载 properties 配置文件: {}", file_path.display());

        let content =
            std::fs::read_to_string(&file_path).map_err(|e| ConfigError::FileRead {
                path: file_path.display().to_string(),
                source: e,
            })?;
        let values = parse_properties(&content);

        debug!("properties 配置文件加载完成，共 {} 项", values.len());
        Ok(Self {
            name: format!("properties:{}", file_path.display()),
            file_path,
            values,
            priority: priority::FILE,
        })
    }

    /// 加载可选的配置文件，文件不存在时返回空配置源
    pub fn optional<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let file_path = path.as_ref();
        if file_path.exists() {
            return Self::load(file_path).map(|source| source.with_priority(priority::DEFAULT_FILE));
        }

        debug!("可选配置文件不存在，跳过: {}", file_path.display());
        Ok(Self {
            name: format!("properties:{}", file_path.display()),
            file_path: file_path.to_path_buf(),
            values: BTreeMap::new(),
            priority: priority::DEFAULT_FILE,
        })
    }

    /// 从字符串内容解析
    pub fn from_str_content(name: impl Into<String>, content: &str) -> Self {
        Self {
            name: name.into(),
            file_path: PathBuf::new(),
            values: parse_properties(content),
            priority: priority::FILE,
        }
    }

    /// 设置优先级
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 获取文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl PropertySource for PropertiesFileSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 解析 properties 文本，重复的键以后出现的为准
pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(pos) = line.find(['=', ':']) else {
            warn!("忽略无法解析的配置行: {}", line);
            continue;
        };

        let key = line[..pos].trim();
        if key.is_empty() {
            warn!("忽略空键配置行: {}", line);
            continue;
        }
        values.insert(key.to_string(), line[pos + 1..].trim().to_string());
    }

    values
}

/// 分层配置源
///
/// 使用 `config` crate 合并多个 TOML/JSON/YAML 文件（按扩展名识别格式）
/// 和带前缀的环境变量，嵌套表以点号键访问，标量统一读为字符串。
#[derive(Debug, Clone)]
pub struct LayeredConfigSource {
    name: String,
    values: BTreeMap<String, String>,
    priority: i32,
}

impl LayeredConfigSource {
    /// 创建构建器
    pub fn builder() -> LayeredConfigSourceBuilder {
        LayeredConfigSourceBuilder::default()
    }

    /// 设置优先级
    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    fn flatten(prefix: &str, value: config::Value, values: &mut BTreeMap<String, String>) {
        match value.kind {
            config::ValueKind::Table(table) => {
                for (key, nested) in table {
                    let full_key = if prefix.is_empty() {
                        key
                    } else {
                        format!("{prefix}.{key}")
                    };
                    Self::flatten(&full_key, nested, values);
                }
            }
            config::ValueKind::Nil => {}
            config::ValueKind::Array(_) => {
                debug!("跳过数组配置项: {}", prefix);
            }
            kind => {
                let raw = match kind {
                    config::ValueKind::String(s) => s,
                    config::ValueKind::Boolean(b) => b.to_string(),
                    config::ValueKind::I64(i) => i.to_string(),
                    config::ValueKind::I128(i) => i.to_string(),
                    config::ValueKind::U64(u) => u.to_string(),
                    config::ValueKind::U128(u) => u.to_string(),
                    config::ValueKind::Float(f) => f.to_string(),
                    _ => return,
                };
                values.insert(prefix.to_string(), raw);
            }
        }
    }
}

impl PropertySource for LayeredConfigSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 分层配置源构建器
#[derive(Debug, Default)]
pub struct LayeredConfigSourceBuilder {
    files: Vec<(PathBuf, bool)>,
    env_prefix: Option<String>,
}

impl LayeredConfigSourceBuilder {
    /// 添加必需的配置文件
    #[must_use]
    pub fn add_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), true));
        self
    }

    /// 添加可选的配置文件
    #[must_use]
    pub fn add_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push((path.as_ref().to_path_buf(), false));
        self
    }

    /// 添加环境变量层，例如前缀 `APP` 时 `APP_SERVER_PORT` 对应 `server.port`
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// 构建配置源
    pub fn build(self) -> ConfigResult<LayeredConfigSource> {
        let mut builder = config::Config::builder();
        let mut layers = Vec::new();

        for (path, required) in &self.files {
            let supported = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| matches!(ext, "toml" | "json" | "yaml" | "yml"));
            if !supported {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                });
            }
            if *required && !path.exists() {
                return Err(ConfigError::FileRead {
                    path: path.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "文件不存在"),
                });
            }

            debug!("添加配置文件层: {}", path.display());
            builder = builder.add_source(config::File::from(path.as_path()).required(*required));
            layers.push(path.display().to_string());
        }

        if let Some(prefix) = &self.env_prefix {
            debug!("添加环境变量层，前缀: {}", prefix);
            builder = builder.add_source(config::Environment::with_prefix(prefix).separator("_"));
            layers.push(format!("env:{prefix}"));
        }

        let settings = builder.build().map_err(|e| ConfigError::Parse {
            source: Box::new(e),
        })?;
        let root = settings
            .collect()
            .map_err(|e| ConfigError::Parse {
                source: Box::new(e),
            })?;

        let mut values = BTreeMap::new();
        for (key, value) in root {
            LayeredConfigSource::flatten(&key, value, &mut values);
        }

        debug!("分层配置加载完成，共 {} 项", values.len());
        let priority = if self.env_prefix.is_some() {
            priority::ENVIRONMENT
        } else {
            priority::FILE
        };
        Ok(LayeredConfigSource {
            name: format!("layered:[{}]", layers.join(", ")),
            values,
            priority,
        })
    }
}
