use crate::config::settings::AppConfig;
use crate::infrastructure::storage::StorageAccessor;
use crate::infrastructure::telegram::ChatGateway;
use crate::infrastructure::transcoder::Transcoder;
use crate::modules::bot::service::BotService;
use crate::modules::conversion::dispatcher::Dispatcher;
use crate::modules::conversion::formats::FormatRegistry;
use crate::modules::conversion::service::ConversionService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub converter: Arc<ConversionService>,
    pub bot: Arc<BotService>,
}

impl AppState {
    /// Wires the services around the given collaborators.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn StorageAccessor>,
        chat: Arc<dyn ChatGateway>,
        transcoder: Arc<dyn Transcoder>,
    ) -> Self {
        let registry = Arc::new(FormatRegistry::default());
        let dispatcher = Dispatcher::with_video(
            registry.clone(),
            storage.clone(),
            transcoder,
            &config.output_bucket,
            config.temp_dir.clone(),
        );
        let converter = ConversionService::new(registry, storage.clone(), dispatcher);
        let bot = BotService::new(&config, storage, chat);

        Self {
            config,
            converter: Arc::new(converter),
            bot: Arc::new(bot),
        }
    }
}
