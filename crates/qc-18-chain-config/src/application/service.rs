//! # Chain Config Service
//!
//! Application service that validates schedules, reconciles them with the
//! locally stored chain and hands out rules snapshots.

use std::sync::Arc;

use crate::algorithms::{check_compatible_axes, check_config_fork_order};
use crate::config::ChainConfigServiceConfig;
use crate::domain::{ChainConfig, ChainConfigError, ConfigCompatError, ForkOrderError, Rules};
use crate::ports::{ChainConfigApi, ChainHead, ChainStore, SetupOutcome};

/// Chain Config Service - owns the active fork schedule.
pub struct ChainConfigService<S: ChainStore> {
    /// Configuration.
    config: ChainConfigServiceConfig,
    /// Chain storage.
    store: Arc<S>,
    /// Schedule currently in force.
    active: ChainConfig,
}

impl<S: ChainStore> ChainConfigService<S> {
    /// Create a new service using the configured network preset.
    pub fn new(config: ChainConfigServiceConfig, store: Arc<S>) -> Self {
        let active = config.network.chain_config();
        Self {
            config,
            store,
            active,
        }
    }

    /// Apply the configured network preset to storage.
    pub fn setup_preset(&mut self) -> Result<SetupOutcome, ChainConfigError> {
        let preset = self.config.network.chain_config();
        self.setup(preset)
    }

    /// Service configuration.
    pub fn config(&self) -> &ChainConfigServiceConfig {
        &self.config
    }

    /// Internal: lowest conflict between two schedules at the stored head,
    /// with the block height storage must be rewound to.
    fn lowest_conflict(
        &self,
        stored: &ChainConfig,
        new: &ChainConfig,
        head: ChainHead,
    ) -> Result<Option<(ConfigCompatError, u64)>, ChainConfigError> {
        let timestamp = self.config.check_upgrade_timestamps.then_some(head.timestamp);
        check_compatible_axes(stored, new, head.height, timestamp)
            .lowest(|ts| self.store.height_at_timestamp(ts))
    }
}

impl<S: ChainStore> ChainConfigApi for ChainConfigService<S> {
    fn validate(&self, config: &ChainConfig) -> Result<(), ForkOrderError> {
        check_config_fork_order(config)
    }

    fn check_compatible(&self, new: &ChainConfig) -> Result<Option<ConfigCompatError>, ChainConfigError> {
        let stored = self.store.stored_config()?;
        let stored = stored.as_ref().unwrap_or(&self.active);
        let head = self.store.head()?;
        Ok(self.lowest_conflict(stored, new, head)?.map(|(err, _)| err))
    }

    fn rules_at(&self, height: u64, timestamp: u64) -> Rules {
        self.active.rules(height, timestamp)
    }

    fn setup(&mut self, new: ChainConfig) -> Result<SetupOutcome, ChainConfigError> {
        check_config_fork_order(&new)?;

        let Some(stored) = self.store.stored_config()? else {
            self.store.write_config(&new)?;
            tracing::info!("[qc-18] Initialised chain config: {}", new);
            self.active = new;
            return Ok(SetupOutcome::Initialized);
        };

        if stored == new {
            self.active = new;
            return Ok(SetupOutcome::Unchanged);
        }

        let head = self.store.head()?;
        let Some((err, height)) = self.lowest_conflict(&stored, &new, head)? else {
            self.store.write_config(&new)?;
            tracing::info!("[qc-18] Updated chain config at height {}: {}", head.height, new);
            self.active = new;
            return Ok(SetupOutcome::Updated);
        };

        tracing::warn!(
            head = head.height,
            axis = %err.axis,
            rewind_to = err.rewind_to,
            rewind_height = height,
            "[qc-18] {}",
            err
        );

        if !self.config.auto_rewind {
            return Err(ChainConfigError::Incompatible(err));
        }

        self.store.rewind_to(height)?;
        self.store.write_config(&new)?;
        tracing::info!("[qc-18] Rewound chain from {} to {} for new config", head.height, height);

        self.active = new;
        Ok(SetupOutcome::Rewound { cause: err, height })
    }

    fn active_config(&self) -> &ChainConfig {
        &self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryChainStore;
    use crate::domain::{
        ForkAxis, Network, FLARE_CHAIN_CONFIG, FLARE_LOCAL_CHAIN_CONFIG, TEST_CHAIN_CONFIG,
        TEST_LAUNCH_CONFIG,
    };

    fn create_test_service(store: Arc<InMemoryChainStore>) -> ChainConfigService<InMemoryChainStore> {
        ChainConfigService::new(ChainConfigServiceConfig::for_testing(), store)
    }

    #[test]
    fn test_service_new_uses_preset() {
        let service = create_test_service(Arc::new(InMemoryChainStore::default()));
        assert_eq!(service.active_config(), &FLARE_LOCAL_CHAIN_CONFIG);
        assert_eq!(service.config().network, Network::Local);
    }

    #[test]
    fn test_setup_initializes_empty_store() {
        let store = Arc::new(InMemoryChainStore::default());
        let mut service = create_test_service(store.clone());

        assert_eq!(service.setup_preset().unwrap(), SetupOutcome::Initialized);
        assert_eq!(store.stored_config().unwrap(), Some(FLARE_LOCAL_CHAIN_CONFIG));
    }

    #[test]
    fn test_setup_unchanged() {
        let store = Arc::new(InMemoryChainStore::with_config(TEST_CHAIN_CONFIG, 0));
        let mut service = create_test_service(store);
        assert_eq!(service.setup(TEST_CHAIN_CONFIG).unwrap(), SetupOutcome::Unchanged);
        assert_eq!(service.active_config(), &TEST_CHAIN_CONFIG);
    }

    #[test]
    fn test_setup_rejects_bad_order() {
        let store = Arc::new(InMemoryChainStore::default());
        let mut service = create_test_service(store.clone());
        let bad = ChainConfig {
            istanbul_block: Some(3),
            ..TEST_CHAIN_CONFIG
        };
        assert!(matches!(
            service.setup(bad),
            Err(ChainConfigError::InvalidSchedule(_))
        ));
        assert!(store.stored_config().unwrap().is_none());
    }

    #[test]
    fn test_setup_compatible_update() {
        // Scheduling a future upgrade is always compatible
        let store = Arc::new(InMemoryChainStore::with_config(TEST_LAUNCH_CONFIG, 0));
        store.extend(10, 1);
        let mut service = create_test_service(store.clone());

        let new = ChainConfig {
            apricot_phase1_block_timestamp: Some(1_000),
            ..TEST_LAUNCH_CONFIG
        };
        assert_eq!(service.setup(new.clone()).unwrap(), SetupOutcome::Updated);
        assert_eq!(store.stored_config().unwrap(), Some(new));
        assert_eq!(store.head().unwrap().height, 10);
    }

    #[test]
    fn test_setup_incompatible_without_rewind() {
        let store = Arc::new(InMemoryChainStore::with_config(TEST_CHAIN_CONFIG, 0));
        store.extend(10, 1);
        let mut service = create_test_service(store.clone());

        let new = ChainConfig {
            chain_id: Some(2),
            ..TEST_CHAIN_CONFIG
        };
        let err = service.setup(new).unwrap_err();
        assert!(matches!(err, ChainConfigError::Incompatible(ref e) if e.what == "EIP158 chain ID"));
        // Storage untouched
        assert_eq!(store.head().unwrap().height, 10);
        assert_eq!(store.stored_config().unwrap(), Some(TEST_CHAIN_CONFIG));
    }

    #[test]
    fn test_setup_rewinds_on_timestamp_mismatch() {
        let store = Arc::new(InMemoryChainStore::with_config(TEST_LAUNCH_CONFIG, 100));
        store.extend(10, 10); // timestamps 100..=200
        let config = ChainConfigServiceConfig {
            auto_rewind: true,
            ..ChainConfigServiceConfig::for_testing()
        };
        let mut service = ChainConfigService::new(config, store.clone());

        // Activating Apricot Phase 1 in the past rewrites blocks from 150 on
        let new = ChainConfig {
            apricot_phase1_block_timestamp: Some(150),
            ..TEST_LAUNCH_CONFIG
        };
        let outcome = service.setup(new.clone()).unwrap();
        match outcome {
            SetupOutcome::Rewound { cause, height } => {
                assert_eq!(cause.axis, ForkAxis::Timestamp);
                assert_eq!(cause.rewind_to, 149);
                assert_eq!(height, 4);
            }
            other => panic!("expected rewind, got {other:?}"),
        }
        assert_eq!(store.head().unwrap().height, 4);
        assert_eq!(service.active_config(), &new);
    }

    #[test]
    fn test_setup_rewinds_to_lower_height_conflict() {
        // An older node stored Istanbul and Muir Glacier at block 3
        let stored = ChainConfig {
            istanbul_block: Some(3),
            muir_glacier_block: Some(3),
            ..TEST_LAUNCH_CONFIG
        };
        let store = Arc::new(InMemoryChainStore::with_config(stored, 100));
        store.extend(10, 10); // timestamps 100..=200
        let config = ChainConfigServiceConfig {
            auto_rewind: true,
            ..ChainConfigServiceConfig::for_testing()
        };
        let mut service = ChainConfigService::new(config, store.clone());

        // Unsets both forks and pulls Apricot Phase 1 into the past
        let new = ChainConfig {
            istanbul_block: None,
            muir_glacier_block: None,
            apricot_phase1_block_timestamp: Some(150),
            ..TEST_LAUNCH_CONFIG
        };
        match service.setup(new).unwrap() {
            SetupOutcome::Rewound { cause, height } => {
                assert_eq!(cause.axis, ForkAxis::Height);
                assert_eq!(cause.what, "Istanbul fork block");
                assert_eq!(height, 2);
            }
            other => panic!("expected rewind, got {other:?}"),
        }
        assert_eq!(store.head().unwrap().height, 2);
    }

    #[test]
    fn test_check_compatible_uses_stored_config() {
        let store = Arc::new(InMemoryChainStore::with_config(TEST_CHAIN_CONFIG, 0));
        store.extend(5, 1);
        // Local preset is active until setup runs
        let service = create_test_service(store);
        assert_eq!(service.active_config(), &FLARE_LOCAL_CHAIN_CONFIG);

        assert!(service.check_compatible(&TEST_CHAIN_CONFIG).unwrap().is_none());
        let err = service.check_compatible(&FLARE_LOCAL_CHAIN_CONFIG).unwrap().unwrap();
        assert_eq!(err.what, "DAO fork block");
        assert_eq!(err.stored_config, None);
        assert_eq!(err.new_config, Some(0));
    }

    #[test]
    fn test_check_compatible_falls_back_to_active() {
        let service = create_test_service(Arc::new(InMemoryChainStore::default()));
        assert!(service.check_compatible(&FLARE_LOCAL_CHAIN_CONFIG).unwrap().is_none());
        assert!(service.check_compatible(&TEST_CHAIN_CONFIG).unwrap().is_some());
    }

    #[test]
    fn test_check_compatible_against_active() {
        let store = Arc::new(InMemoryChainStore::with_config(FLARE_CHAIN_CONFIG, 0));
        store.extend(5, 1);
        let mut service = create_test_service(store);
        service.setup(FLARE_CHAIN_CONFIG).unwrap();

        assert!(service.check_compatible(&FLARE_CHAIN_CONFIG).unwrap().is_none());
        let other = ChainConfig {
            chain_id: Some(19),
            ..FLARE_CHAIN_CONFIG
        };
        assert!(service.check_compatible(&other).unwrap().is_some());
    }

    #[test]
    fn test_rules_at_uses_active_config() {
        let service = create_test_service(Arc::new(InMemoryChainStore::default()));
        let rules = service.rules_at(0, 0);
        assert!(rules.is_apricot_phase4());
        assert!(service.validate(&TEST_CHAIN_CONFIG).is_ok());
    }
}
