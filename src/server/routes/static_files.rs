//! Static web UI served from disk

use std::path::PathBuf;
use warp::Filter;

/// `GET /` and `GET /<file>` from `dir`; a directory path serves its `index.html`
pub fn create_static_routes(
    dir: PathBuf,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    warp::get().and(warp::fs::dir(dir))
}
