mod http_provider_channel;
mod mock_delivery_channel;

pub use http_provider_channel::HttpProviderChannel;
pub use mock_delivery_channel::{MockDeliveryChannel, SentOtp};
