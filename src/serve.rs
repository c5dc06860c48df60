//! 本地 HTTP 服务模块
//! - 使用 tiny_http 监听地址，把每个请求交给 `Router::dispatch`
//! - 请求之间无共享可变状态

use std::io::{Cursor, Read};

use anyhow::Result;
use tiny_http::{Header, Response, Server};
use tracing::{debug, info, warn};

use crate::router::{path_of, Route, Router};

/// 绑定地址并阻塞处理请求
pub(crate) fn serve(router: &Router, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr).map_err(|e| anyhow::anyhow!("绑定地址失败: {}: {}", addr, e))?;
    let local = server.server_addr().to_ip().map(|a| a.to_string()).unwrap_or_else(|| addr.to_string());
    info!(addr = %local, "listening");
    println!("🚀 访问: http://{}", local);
    if open { let _ = webbrowser::open(&format!("http://{}", local)); }
    serve_requests(router, &server);
    Ok(())
}

fn serve_requests(router: &Router, server: &Server) {
    for rq in server.incoming_requests() {
        let path = path_of(rq.url()).to_string();
        let route = router.dispatch(&path);
        debug!(method = %rq.method(), path = %path, status = status_of(route), "request");
        if let Err(e) = rq.respond(response_for(route)) {
            warn!(path = %path, error = %e, "failed to write response");
        }
    }
}

fn status_of(route: &Route) -> u16 {
    match route {
        Route::Redirect { status, .. } => *status,
        Route::StaticAsset(_) | Route::Fallback(_) => 200,
    }
}

fn with_header<R: Read>(resp: Response<R>, name: &str, value: &str) -> Response<R> {
    match Header::from_bytes(name.as_bytes(), value.as_bytes()) {
        Ok(h) => resp.with_header(h),
        Err(()) => {
            warn!(header = name, "dropping header with invalid value");
            resp
        }
    }
}

fn response_for(route: &Route) -> Response<Cursor<Vec<u8>>> {
    match route {
        Route::Redirect { target, status } => {
            let resp = Response::from_string(String::new()).with_status_code(*status);
            with_header(resp, "Location", target)
        }
        Route::StaticAsset(asset) | Route::Fallback(asset) => {
            let resp = Response::from_string(asset.body.clone()).with_status_code(200);
            let resp = with_header(resp, "Content-Type", asset.content_type);
            with_header(resp, "Cache-Control", &asset.cache_control())
        }
    }
}
