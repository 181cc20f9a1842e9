// ==========================================
// 新品铺货费计算器 - 规则配置快照持有者
// ==========================================
// 读: 取 Arc 快照，计算期间不受重载影响
// 写: 整体替换快照，从不原地修改
// ==========================================

use crate::config::config_loader::ConfigRepository;
use crate::config::error::ConfigResult;
use crate::domain::rule::RuleConfiguration;
use std::path::Path;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

#[derive(Debug)]
pub struct ConfigStore {
    current: RwLock<Arc<RuleConfiguration>>,
}

impl ConfigStore {
    pub fn new(config: RuleConfiguration) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// 从文件加载并创建
    pub fn open<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        Ok(Self::new(ConfigRepository::load(path)?))
    }

    /// 当前快照
    pub fn current(&self) -> Arc<RuleConfiguration> {
        // 锁中毒时快照本身仍完整，直接取用
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// 发布新快照，返回旧快照
    pub fn replace(&self, config: RuleConfiguration) -> Arc<RuleConfiguration> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let previous = std::mem::replace(&mut *guard, Arc::new(config));
        info!("规则配置快照已替换");
        previous
    }

    /// 重新加载；失败时保留原快照
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> ConfigResult<Arc<RuleConfiguration>> {
        match ConfigRepository::load(path.as_ref()) {
            Ok(config) => {
                self.replace(config);
                Ok(self.current())
            }
            Err(e) => {
                warn!(error = %e, "规则配置重载失败，沿用当前快照");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_with_fee(fee: f64) -> RuleConfiguration {
        let mut base_fees = BTreeMap::new();
        base_fees.insert(
            "护肤".to_string(),
            BTreeMap::from([("旗舰店".to_string(), fee)]),
        );
        RuleConfiguration {
            base_fees,
            ..RuleConfiguration::default()
        }
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let store = ConfigStore::new(config_with_fee(300.0));
        let held = store.current();

        let previous = store.replace(config_with_fee(400.0));

        // 已取出的快照不变
        assert_eq!(held.unit_fee("护肤", "旗舰店"), 300.0);
        assert_eq!(previous.unit_fee("护肤", "旗舰店"), 300.0);
        assert_eq!(store.current().unit_fee("护肤", "旗舰店"), 400.0);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let store = ConfigStore::new(config_with_fee(300.0));
        let result = store.reload("missing_coefficients.yaml");

        assert!(result.is_err());
        assert_eq!(store.current().unit_fee("护肤", "旗舰店"), 300.0);
    }
}
