/// Tests for RenderGraph
///
/// These tests validate pass declaration (builder scope, duplicate writes,
/// attachment rules), ordering, culling, lazy allocation and the per-frame
/// cleanup performed by execute().

use std::sync::Arc;
use super::*;
use crate::error::Error;
use crate::render_graph::{AccessFlags, GraphPhase, RenderPassEvent, TextureDescriptor, TextureHandle};
use crate::renderer::{Texture, TextureFormat};
use crate::renderer::mock_renderer::{MockCommandList, MockRenderer, MockTexture};

const POST: RenderPassEvent = RenderPassEvent::AfterRenderingPostProcessing;

fn begin_with_camera(graph: &mut RenderGraph) -> TextureHandle {
    graph.begin_frame();
    let camera: Arc<dyn Texture> = Arc::new(MockTexture::color_target("CameraColor", 64, 32));
    graph.import_texture("CameraColor", camera).unwrap()
}

fn transient(graph: &mut RenderGraph, name: &str) -> TextureHandle {
    graph.create_texture(TextureDescriptor::new(name, 64, 32, TextureFormat::R8G8B8A8_UNORM)).unwrap()
}

/// Raster pass writing `target` and issuing one draw
fn add_draw_pass(graph: &mut RenderGraph, name: &str, event: RenderPassEvent, target: TextureHandle) {
    graph.add_pass(name, event,
        |builder| builder.set_render_attachment(target, 0, AccessFlags::WRITE),
        |ctx| ctx.cmd().draw(3, 0),
    ).unwrap();
}

// ============================================================================
// Tests: Frame lifecycle
// ============================================================================

#[test]
fn test_render_graph_new_is_idle() {
    let graph = RenderGraph::new();
    assert_eq!(graph.phase(), GraphPhase::Idle);
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_begin_frame_drops_unexecuted_passes() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    add_draw_pass(&mut graph, "Stale", POST, camera);
    assert_eq!(graph.pass_count(), 1);

    graph.begin_frame();
    assert_eq!(graph.pass_count(), 0);
    assert_eq!(graph.frame_index(), 2);
}

#[test]
fn test_execute_without_frame_fails() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();

    let result = graph.execute(&mut renderer, &mut cmd);
    assert!(matches!(result, Err(Error::ResourceNotReady(_))));
}

// ============================================================================
// Tests: Pass declaration
// ============================================================================

#[test]
fn test_builder_registers_on_drop() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    {
        let mut builder = graph.add_raster_pass("Scoped", POST);
        builder.set_render_attachment(camera, 0, AccessFlags::WRITE).unwrap();
        builder.set_render_func(|ctx| ctx.cmd().draw(3, 0));
    }
    assert_eq!(graph.pass_names(), vec!["Scoped"]);
}

#[test]
fn test_builder_without_render_func_is_discarded() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    {
        let mut builder = graph.add_raster_pass("NoFunc", POST);
        builder.set_render_attachment(camera, 0, AccessFlags::WRITE).unwrap();
    }
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_duplicate_attachment_write_fails() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    let other = transient(&mut graph, "Other");

    let result = graph.add_pass("Twice", POST,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.set_render_attachment(other, 0, AccessFlags::WRITE)
        },
        |_| Ok(()),
    );

    assert!(matches!(result, Err(Error::DuplicateWrite(_))));
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_duplicate_texture_write_fails() {
    let mut graph = RenderGraph::new();
    begin_with_camera(&mut graph);
    let storage = transient(&mut graph, "Storage");

    let mut builder = graph.add_raster_pass("Twice", POST);
    builder.use_texture(storage, AccessFlags::WRITE).unwrap();
    let result = builder.use_texture(storage, AccessFlags::READ_WRITE);
    assert!(matches!(result, Err(Error::DuplicateWrite(_))));
}

#[test]
fn test_failed_builder_keeps_failing() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    {
        let mut builder = graph.add_raster_pass("Broken", POST);
        assert!(builder.set_render_attachment(camera, 1, AccessFlags::WRITE).is_err());
        assert!(builder.set_render_attachment(camera, 0, AccessFlags::WRITE).is_err());
        builder.set_render_func(|_| Ok(()));
    }
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_attachment_index_out_of_range() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);

    let result = graph.add_pass("Mrt", POST,
        |builder| builder.set_render_attachment(camera, 1, AccessFlags::WRITE),
        |_| Ok(()),
    );
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_sampling_own_render_target_rejected() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);

    let result = graph.add_pass("Feedback", POST,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.use_texture(camera, AccessFlags::READ)
        },
        |_| Ok(()),
    );
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_empty_access_rejected() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);

    let result = graph.add_pass("Nothing", POST,
        |builder| builder.use_texture(camera, AccessFlags::empty()),
        |_| Ok(()),
    );
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_handle_from_previous_frame_rejected() {
    let mut graph = RenderGraph::new();
    let old = begin_with_camera(&mut graph);
    begin_with_camera(&mut graph);

    let result = graph.add_pass("Stale", POST,
        |builder| builder.use_texture(old, AccessFlags::READ),
        |_| Ok(()),
    );
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_add_pass_outside_frame_fails() {
    let mut graph = RenderGraph::new();
    let result = graph.add_pass("Early", POST, |_| Ok(()), |_| Ok(()));
    assert!(matches!(result, Err(Error::ResourceNotReady(_))));
    assert_eq!(graph.pass_count(), 0);
}

// ============================================================================
// Tests: Copy pass
// ============================================================================

#[test]
fn test_copy_pass_onto_itself_rejected() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);

    let result = graph.add_copy_pass("Self", camera, camera, POST);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_copy_pass_extent_mismatch_rejected() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    let small = graph.create_texture(
        TextureDescriptor::new("Small", 16, 16, TextureFormat::R8G8B8A8_UNORM)).unwrap();

    let result = graph.add_copy_pass("Mismatch", small, camera, POST);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_copy_pass_records_copy() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let scratch = transient(&mut graph, "Scratch");

    add_draw_pass(&mut graph, "Draw", POST, scratch);
    graph.add_copy_pass("Blit", scratch, camera, POST).unwrap();
    graph.execute(&mut renderer, &mut cmd).unwrap();

    assert_eq!(cmd.commands.last().map(String::as_str), Some("copy_texture:Scratch->CameraColor"));
}

// ============================================================================
// Tests: Ordering
// ============================================================================

#[test]
fn test_execution_order_by_event_then_add_order() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);

    add_draw_pass(&mut graph, "Late", RenderPassEvent::AfterRendering, camera);
    add_draw_pass(&mut graph, "PostA", POST, camera);
    add_draw_pass(&mut graph, "Early", RenderPassEvent::BeforeRendering, camera);
    add_draw_pass(&mut graph, "PostB", POST, camera);

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.execution_order(), ["Early", "PostA", "PostB", "Late"]);
}

#[test]
fn test_read_after_write_observes_writer() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let intermediate = transient(&mut graph, "Intermediate");

    add_draw_pass(&mut graph, "Writer", POST, intermediate);
    graph.add_pass("Reader", POST,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.use_texture(intermediate, AccessFlags::READ)
        },
        move |ctx| {
            let source = ctx.texture(intermediate)?;
            ctx.cmd().bind_texture(0, &source)
        },
    ).unwrap();

    let stats = graph.execute(&mut renderer, &mut cmd).unwrap();
    assert_eq!(stats.textures_allocated, 1);
    assert_eq!(cmd.commands, vec![
        "begin_render_pass:Writer:Intermediate",
        "draw:3",
        "end_render_pass",
        "begin_render_pass:Reader:CameraColor",
        "bind_texture:0:Intermediate",
        "end_render_pass",
    ]);
}

/// "Reader" reads `intermediate` at `reader_event`; "Writer" was added first at `writer_event`
fn add_writer_then_reader(
    graph: &mut RenderGraph,
    writer_event: RenderPassEvent,
    reader_event: RenderPassEvent,
) {
    let camera = begin_with_camera(graph);
    let intermediate = transient(graph, "Intermediate");
    add_draw_pass(graph, "Writer", writer_event, intermediate);
    graph.add_pass("Reader", reader_event,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.use_texture(intermediate, AccessFlags::READ)
        },
        |ctx| ctx.cmd().draw(3, 0),
    ).unwrap();
}

#[test]
fn test_reader_scheduled_before_its_writer_fails() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    add_writer_then_reader(&mut graph, RenderPassEvent::AfterRendering, RenderPassEvent::BeforeRendering);

    assert!(matches!(graph.compile(), Err(Error::ResourceNotReady(_))));

    let result = graph.execute(&mut renderer, &mut cmd);
    assert!(matches!(result, Err(Error::ResourceNotReady(_))));
    assert!(cmd.commands.is_empty());
    assert!(renderer.created_textures().is_empty());
    assert_eq!(graph.phase(), GraphPhase::Idle);
    assert_eq!(graph.pass_count(), 0);
}

#[test]
fn test_reader_at_later_event_than_writer_is_valid() {
    let mut graph = RenderGraph::new();
    add_writer_then_reader(&mut graph, RenderPassEvent::BeforeRendering, RenderPassEvent::AfterRendering);

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.execution_order(), ["Writer", "Reader"]);
}

#[test]
fn test_writer_added_after_reader_is_not_a_dependency() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    let intermediate = transient(&mut graph, "Intermediate");
    graph.add_pass("Reader", RenderPassEvent::BeforeRendering,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.use_texture(intermediate, AccessFlags::READ)
        },
        |ctx| ctx.cmd().draw(3, 0),
    ).unwrap();
    add_draw_pass(&mut graph, "Writer", RenderPassEvent::AfterRendering, intermediate);

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.execution_order(), ["Reader"]);
    assert_eq!(compiled.culled_passes(), ["Writer"]);
}

// ============================================================================
// Tests: Culling and lifetimes
// ============================================================================

#[test]
fn test_unconsumed_transient_pass_is_culled() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let unused = transient(&mut graph, "Unused");

    add_draw_pass(&mut graph, "Orphan", POST, unused);
    add_draw_pass(&mut graph, "Main", POST, camera);

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.culled_passes(), ["Orphan"]);

    let stats = graph.execute(&mut renderer, &mut cmd).unwrap();
    assert_eq!(stats.passes_executed, 1);
    assert_eq!(stats.passes_culled, 1);
    assert!(renderer.created_textures().is_empty());
}

#[test]
fn test_culling_disabled_keeps_pass() {
    let mut graph = RenderGraph::new();
    begin_with_camera(&mut graph);
    let unused = transient(&mut graph, "Unused");
    {
        let mut builder = graph.add_raster_pass("Kept", POST);
        builder.set_render_attachment(unused, 0, AccessFlags::WRITE).unwrap();
        builder.allow_culling(false);
        builder.set_render_func(|_| Ok(()));
    }

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.execution_order(), ["Kept"]);
    assert!(compiled.culled_passes().is_empty());
}

#[test]
fn test_chain_into_imported_texture_is_kept() {
    let mut graph = RenderGraph::new();
    let camera = begin_with_camera(&mut graph);
    let a = transient(&mut graph, "A");

    add_draw_pass(&mut graph, "ProduceA", POST, a);
    graph.add_copy_pass("BlitA", a, camera, POST).unwrap();

    let compiled = graph.compile().unwrap();
    assert_eq!(compiled.execution_order(), ["ProduceA", "BlitA"]);
    assert_eq!(compiled.lifetime(a), Some(TextureLifetime { first_pass: 0, last_pass: 1 }));
    assert_eq!(compiled.lifetime(camera), Some(TextureLifetime { first_pass: 1, last_pass: 1 }));
}

// ============================================================================
// Tests: Execution
// ============================================================================

#[test]
fn test_execute_releases_frame_state() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let scratch = transient(&mut graph, "Scratch");

    add_draw_pass(&mut graph, "Draw", POST, scratch);
    graph.add_copy_pass("Blit", scratch, camera, POST).unwrap();
    let stats = graph.execute(&mut renderer, &mut cmd).unwrap();

    assert_eq!(stats, ExecutionStats {
        passes_executed: 2,
        passes_culled: 0,
        textures_allocated: 1,
        textures_released: 1,
    });
    assert_eq!(graph.phase(), GraphPhase::Idle);
    assert_eq!(graph.pass_count(), 0);
    assert_eq!(renderer.live_textures(), 0);
    assert!(graph.texture_desc(scratch).is_err());
}

#[test]
fn test_read_before_any_write_sees_clear_state() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let fresh = graph.create_texture(
        TextureDescriptor::new("Fresh", 64, 32, TextureFormat::R8G8B8A8_UNORM)
            .with_clear([0.0, 0.0, 0.0, 1.0])).unwrap();

    graph.add_pass("Sample", POST,
        |builder| {
            builder.set_render_attachment(camera, 0, AccessFlags::WRITE)?;
            builder.use_texture(fresh, AccessFlags::READ)
        },
        move |ctx| {
            let texture = ctx.texture(fresh)?;
            ctx.cmd().bind_texture(0, &texture)
        },
    ).unwrap();

    graph.execute(&mut renderer, &mut cmd).unwrap();
    assert_eq!(cmd.commands[0], "clear_texture:Fresh");
    assert_eq!(cmd.count("bind_texture:0:Fresh"), 1);
}

#[test]
fn test_undeclared_access_fails_and_cleans_up() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let hidden = transient(&mut graph, "Hidden");

    add_draw_pass(&mut graph, "Producer", POST, hidden);
    graph.add_pass("Sneaky", POST,
        |builder| builder.set_render_attachment(camera, 0, AccessFlags::WRITE),
        move |ctx| ctx.texture(hidden).map(|_| ()),
    ).unwrap();

    let result = graph.execute(&mut renderer, &mut cmd);
    assert!(matches!(result, Err(Error::UndeclaredResourceAccess(_))));
    assert_eq!(graph.phase(), GraphPhase::Idle);
    assert_eq!(graph.pass_count(), 0);
    assert_eq!(cmd.count("end_render_pass"), 1);
}

#[test]
fn test_render_target_in_pass() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);

    graph.add_pass("Clear", POST,
        |builder| builder.set_render_attachment(camera, 0, AccessFlags::WRITE),
        |ctx| {
            let target = ctx.render_target()?;
            ctx.cmd().clear_texture(&target, [0.0; 4])
        },
    ).unwrap();

    graph.execute(&mut renderer, &mut cmd).unwrap();
    assert_eq!(cmd.count("clear_texture:CameraColor"), 1);
}

#[test]
fn test_render_target_without_attachment_fails() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);

    graph.add_pass("NoTarget", POST,
        |builder| builder.use_texture(camera, AccessFlags::READ),
        |ctx| ctx.render_target().map(|_| ()),
    ).unwrap();

    let result = graph.execute(&mut renderer, &mut cmd);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

#[test]
fn test_allocation_failure_aborts_frame() {
    let mut graph = RenderGraph::new();
    let mut renderer = MockRenderer::new();
    renderer.fail_texture_creation = true;
    let mut cmd = MockCommandList::new();
    let camera = begin_with_camera(&mut graph);
    let scratch = transient(&mut graph, "Scratch");

    add_draw_pass(&mut graph, "Draw", POST, scratch);
    graph.add_copy_pass("Blit", scratch, camera, POST).unwrap();

    assert!(matches!(graph.execute(&mut renderer, &mut cmd), Err(Error::OutOfMemory)));
    assert!(cmd.commands.is_empty());
    assert_eq!(graph.phase(), GraphPhase::Idle);
}
