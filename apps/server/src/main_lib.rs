use std::sync::Arc;

use crate::{config::Config, domain_events::TracingDomainEventSink};
use ledgersync_connect::HttpProviderClient;
use ledgersync_core::{
    accounts::AccountRepositoryTrait,
    events::DomainEventSink,
    families::FamilyRepositoryTrait,
    import::ImportPipeline,
    items::{LinkedItemRepositoryTrait, LinkedItemService},
    providers::ProviderRegistry,
    reporting::{ErrorReporter, LogErrorReporter},
    sync::{
        AccountSyncHandler, ChannelSyncQueue, FamilySyncHandler, ItemSyncHandler, SyncConfig,
        SyncHandlers, SyncRecordRepositoryTrait, SyncRunner, SyncScheduler,
    },
    transfers::TransferService,
    webhooks::WebhookProcessor,
};
use ledgersync_storage_sqlite::{
    db, AccountRepository, BalanceRepository, EntryRepository, FamilyRepository,
    InvestmentRepository, LinkedItemRepository, SyncRecordRepository, TransferRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Pool size for the read connections; writes go through the single writer.
const DB_MAX_CONNECTIONS: u32 = 8;

pub struct AppState {
    pub families: Arc<dyn FamilyRepositoryTrait>,
    pub scheduler: Arc<SyncScheduler>,
    pub transfer_service: Arc<TransferService>,
    pub item_service: Arc<LinkedItemService>,
    pub webhook_processor: Arc<WebhookProcessor>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let (pool, writer) = db::open(&config.db_path, DB_MAX_CONNECTIONS)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let families: Arc<dyn FamilyRepositoryTrait> =
        Arc::new(FamilyRepository::new(pool.clone(), writer.clone()));
    let items: Arc<dyn LinkedItemRepositoryTrait> =
        Arc::new(LinkedItemRepository::new(pool.clone(), writer.clone()));
    let accounts: Arc<dyn AccountRepositoryTrait> =
        Arc::new(AccountRepository::new(pool.clone(), writer.clone()));
    let sync_records: Arc<dyn SyncRecordRepositoryTrait> =
        Arc::new(SyncRecordRepository::new(pool.clone(), writer.clone()));
    let entries = Arc::new(EntryRepository::new(pool.clone(), writer.clone()));
    let investments = Arc::new(InvestmentRepository::new(pool.clone(), writer.clone()));
    let balances = Arc::new(BalanceRepository::new(pool.clone(), writer.clone()));
    let transfers_repository = Arc::new(TransferRepository::new(pool.clone(), writer.clone()));

    let event_sink: Arc<dyn DomainEventSink> = Arc::new(TracingDomainEventSink::new());
    let error_reporter: Arc<dyn ErrorReporter> = Arc::new(LogErrorReporter);

    if config.provider.client_id.is_empty() || config.provider.secret.is_empty() {
        tracing::warn!("Provider credentials are not configured; provider calls will fail");
    }
    let provider_client = HttpProviderClient::new(config.provider.clone())?;
    let providers = Arc::new(ProviderRegistry::new().with_provider(Arc::new(provider_client)));

    let sync_config = SyncConfig::default();
    let (queue, queue_receiver) = ChannelSyncQueue::new();
    let scheduler = Arc::new(SyncScheduler::new(
        sync_records.clone(),
        families.clone(),
        accounts.clone(),
        items.clone(),
        Arc::new(queue),
        sync_config.clone(),
    ));

    let transfer_service = Arc::new(TransferService::new(
        transfers_repository,
        event_sink.clone(),
    ));
    let pipeline = Arc::new(ImportPipeline::new(
        providers.clone(),
        items.clone(),
        accounts.clone(),
        entries.clone(),
        investments.clone(),
        event_sink.clone(),
        sync_config,
    ));
    let handlers = SyncHandlers {
        family: Arc::new(FamilySyncHandler::new(
            accounts.clone(),
            items.clone(),
            scheduler.clone(),
            transfer_service.clone(),
        )),
        item: Arc::new(ItemSyncHandler::new(
            items.clone(),
            pipeline,
            scheduler.clone(),
            transfer_service.clone(),
        )),
        account: Arc::new(AccountSyncHandler::new(
            accounts,
            entries,
            investments,
            balances,
            event_sink.clone(),
        )),
    };
    let runner = Arc::new(SyncRunner::new(sync_records, handlers, event_sink.clone()));
    queue_receiver.start_workers(runner, config.sync_workers);

    let item_service = Arc::new(LinkedItemService::new(
        items.clone(),
        providers.clone(),
        scheduler.clone(),
    ));
    let webhook_processor = Arc::new(WebhookProcessor::new(
        providers,
        items,
        scheduler.clone(),
        error_reporter,
        event_sink,
    ));

    Ok(Arc::new(AppState {
        families,
        scheduler,
        transfer_service,
        item_service,
        webhook_processor,
    }))
}
