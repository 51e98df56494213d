use anyhow::{anyhow, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod gesture;
mod layout;
mod services;
mod utils;

use config::{Config, LogFormat};
use events::SwipeEvent;
use gesture::SwipeDetector;
use layout::{LayoutHints, ViewportProfile};
use services::{create_touch_listener, SwipeDispatcher, VirtualDevice};

/// Ёмкость очереди свайпов между слушателем и диспетчером
const SWIPE_QUEUE_CAPACITY: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "swipe-rust")]
#[command(about = "Распознавание горизонтальных свайпов на сенсорном экране")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "swipe.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция касаний, без uinput)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Arc::new(Config::load(&args.config)?);

    // Инициализация системы логирования
    init_tracing(
        args.log_level.as_deref().unwrap_or(&config.logging.level),
        config.logging.format,
    )?;

    info!("Запуск Swipe Rust v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - касания эмулируются, действия только логируются");
    } else {
        utils::permissions::check_permissions(!config.actions.is_empty())?;
    }

    // Виртуальная клавиатура нужна только при настроенных действиях
    let virtual_device = if config.actions.is_empty() {
        None
    } else {
        Some(Arc::new(Mutex::new(VirtualDevice::new(
            "Swipe-Rust Virtual Keyboard",
            args.dry_run,
        )?)))
    };

    let (swipe_tx, swipe_rx) = mpsc::channel::<SwipeEvent>(SWIPE_QUEUE_CAPACITY);

    let mut detector = SwipeDetector::new(config.swipe);
    detector.on_swipe(move |direction| {
        if let Err(e) = swipe_tx.try_send(SwipeEvent::new(direction)) {
            warn!("{}", swipe_error!(channel, "Свайп {} потерян: {}", direction, e));
        }
    });

    let touch_listener = create_touch_listener(config.clone(), detector, args.dry_run)?;
    let dispatcher = SwipeDispatcher::new(config.clone(), virtual_device.clone())?;

    match config.viewport.size_or(touch_listener.surface()) {
        Some(size) => {
            let profile = ViewportProfile::detect(size, config.viewport.touch.unwrap_or(true));
            let hints = LayoutHints::compute(size, config.viewport.visual_height_or(size), &profile);
            info!("Вьюпорт {}: {} ({:?})", size, profile, hints.nav);
            dispatcher.announce_viewport(size, profile, hints);
        }
        None => warn!("Размер сенсорной поверхности неизвестен, профиль вьюпорта не определён"),
    }

    info!("Все компоненты инициализированы");

    // Запуск всех сервисов параллельно
    let mut listener_handle = tokio::spawn(async move { touch_listener.run().await });
    let dispatcher_handle = tokio::spawn(async move {
        if let Err(e) = dispatcher.run(swipe_rx).await {
            error!("Ошибка в SwipeDispatcher: {}", e);
        }
    });

    info!("Все сервисы запущены");

    // Ожидание сигнала завершения или остановки слушателя
    let listener_failure = wait_for_shutdown(signal::ctrl_c(), &mut listener_handle).await;
    let listener_running = listener_failure.is_none();

    info!("Завершение работы...");

    // Слушатель владеет отправителем: после его остановки диспетчер дочитывает очередь и выходит
    if listener_running {
        listener_handle.abort();
    }

    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        if listener_running {
            let _ = listener_handle.await;
        }
        let _ = dispatcher_handle.await;
    })
    .await;

    match shutdown_result {
        Ok(_) => info!("Все сервисы завершили работу корректно"),
        Err(_) => warn!("Таймаут при завершении сервисов"),
    }

    // Гарантируем отсутствие залипших клавиш
    if let Some(device) = &virtual_device {
        if let Err(e) = device.lock().release_all_keys() {
            warn!("Не удалось выполнить release_all_keys: {}", e);
        }
    }

    if let Some(failure) = listener_failure {
        return Err(failure.context("Сенсорный ввод потерян, демон остановлен"));
    }

    info!("Swipe Rust завершил работу");
    Ok(())
}

/// Ждёт сигнала завершения. Если слушатель остановился раньше, возвращает причину.
async fn wait_for_shutdown<S>(
    shutdown: S,
    listener: &mut JoinHandle<error::Result<()>>,
) -> Option<anyhow::Error>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        signal = shutdown => {
            match signal {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
            None
        }
        finished = listener => {
            let failure = match finished {
                Ok(Ok(())) => anyhow!("TouchListener завершился без сигнала завершения"),
                Ok(Err(e)) => anyhow::Error::from(e),
                Err(e) => anyhow::Error::from(e),
            };
            error!("Ошибка в TouchListener: {:#}", failure);
            Some(failure)
        }
    }
}

fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer().compact()).init(),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SwipeError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_lost_touch_device_ends_wait_with_error() {
        let mut listener: JoinHandle<error::Result<()>> = tokio::spawn(async {
            Err(SwipeError::Io(std::io::Error::from_raw_os_error(19)))
        });

        let failure = wait_for_shutdown(std::future::pending(), &mut listener).await;

        assert!(failure.is_some());
        assert!(listener.is_finished());
    }

    #[tokio::test]
    async fn test_listener_returning_ok_is_still_a_failure() {
        let mut listener: JoinHandle<error::Result<()>> = tokio::spawn(async { Ok(()) });

        let failure = wait_for_shutdown(std::future::pending(), &mut listener).await;

        assert!(failure.is_some());
    }

    #[tokio::test]
    async fn test_shutdown_signal_leaves_listener_running() {
        let mut listener: JoinHandle<error::Result<()>> = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        });

        let failure = wait_for_shutdown(async { Ok(()) }, &mut listener).await;

        assert!(failure.is_none());
        assert!(!listener.is_finished());
        listener.abort();
    }
}
