pub mod downloader;
pub mod index;
pub mod layout;
pub mod store;
pub mod toc;

pub use downloader::{HttpImageFetcher, ImageDownloader};
pub use index::DatasetIndex;
pub use layout::{establish_binary_directory, get_dir_balance, total_balance};
pub use store::{download_and_store_binary, StoreReport};
pub use toc::{find_submission_by_id, load_toc, merge_toc, save_toc};
