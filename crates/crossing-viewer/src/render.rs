// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Render helper: uploads egui geometry and presents one frame.

use crate::viewport::Viewport;
use egui_wgpu::wgpu;
use tracing::{debug, error};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.035,
    g: 0.04,
    b: 0.05,
    a: 1.0,
};

/// Draw the UI into the next swapchain image. Returns false when the frame was
/// skipped (surface busy, lost twice, or out of memory).
pub fn render_frame(
    vp: &mut Viewport,
    paint_jobs: &[egui::epaint::ClippedPrimitive],
    textures_delta: egui::TexturesDelta,
    screen_desc: &egui_wgpu::ScreenDescriptor,
) -> bool {
    let gpu = &mut vp.gpu;
    let frame = match gpu.surface.get_current_texture() {
        Ok(f) => f,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.reconfigure();
            match gpu.surface.get_current_texture() {
                Ok(f) => f,
                Err(err) => {
                    debug!(%err, "surface still unavailable; frame skipped");
                    return false;
                }
            }
        }
        Err(wgpu::SurfaceError::OutOfMemory) => {
            error!("GPU out of memory; frame skipped");
            return false;
        }
        Err(err) => {
            debug!(%err, "frame skipped");
            return false;
        }
    };
    let view = frame
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let egui_renderer = &mut vp.egui_renderer;
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui-encoder"),
        });
    for (id, delta) in textures_delta.set {
        egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
    }
    let extra = egui_renderer.update_buffers(
        &gpu.device,
        &gpu.queue,
        &mut encoder,
        paint_jobs,
        screen_desc,
    );
    {
        let rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("egui"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        let mut rpass = rpass.forget_lifetime();
        egui_renderer.render(&mut rpass, paint_jobs, screen_desc);
    }
    for id in textures_delta.free {
        egui_renderer.free_texture(&id);
    }

    gpu.queue
        .submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
    frame.present();
    true
}
