//! Per-chunk light orchestration.
//!
//! Light moves in two channels, block and sky, both flood filled with a work
//! queue. Skylight additionally follows the column heightmap: everything at
//! or above a column's height is full sky, and light pours over the rim of
//! higher neighbouring columns into lower ones.
//!
//! Cross-chunk propagation is pull based. A chunk never writes into a
//! neighbour; instead it snapshots the neighbour's boundary light planes and
//! heightmap edges (one lock at a time, before taking its own lock) and
//! re-seeds its own flood fill from them. Rerunning a pull converges because
//! stored light only ever increases toward the fixed point of the current
//! inputs.

use lumen_utils::{BlockStateId, Direction};
use smallvec::SmallVec;

use crate::chunk::neighbours::NeighbourSet;
use crate::chunk::section::ChunkSection;
use crate::chunk::{
    BLOCKS_PER_SECTION, COLUMNS_PER_CHUNK, Chunk, ChunkData, HEIGHT_OPEN, block_index,
    column_index,
};
use crate::events::SectionLightUpdate;
use crate::light::{LightCell, LightQueue, MAX_LIGHT};

/// One pending flood fill step.
#[derive(Debug, Clone, Copy, Default)]
struct LightNode {
    x: u8,
    z: u8,
    y: i32,
    level: u8,
    /// Direction pointing back at the cell this light arrived from.
    from: Option<Direction>,
}

/// Heightmap values along the four facing edge rows of the orthogonal
/// neighbours, indexed by the coordinate running along the shared edge.
#[derive(Debug)]
struct HeightmapEdges {
    north: [i32; 16],
    south: [i32; 16],
    west: [i32; 16],
    east: [i32; 16],
}

impl HeightmapEdges {
    fn new() -> Self {
        Self {
            north: [HEIGHT_OPEN; 16],
            south: [HEIGHT_OPEN; 16],
            west: [HEIGHT_OPEN; 16],
            east: [HEIGHT_OPEN; 16],
        }
    }

    fn row(&self, dir: Direction) -> &[i32; 16] {
        match dir {
            Direction::North => &self.north,
            Direction::South => &self.south,
            Direction::West => &self.west,
            Direction::East => &self.east,
            Direction::Down | Direction::Up => unreachable!("edges are horizontal"),
        }
    }

    fn row_mut(&mut self, dir: Direction) -> &mut [i32; 16] {
        match dir {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::West => &mut self.west,
            Direction::East => &mut self.east,
            Direction::Down | Direction::Up => unreachable!("edges are horizontal"),
        }
    }
}

/// Boundary light planes and heightmap edges copied out of the four
/// orthogonal neighbours. Taken without holding this chunk's lock; treated
/// as a consistent-enough snapshot.
struct NeighbourSnapshot {
    edges: HeightmapEdges,
    /// Per horizontal direction (in [`Direction::HORIZONTAL`] order), per
    /// section index, the neighbour's facing boundary plane indexed
    /// `sy << 4 | a` where `a` runs along the shared edge.
    planes: [Vec<Option<Box<[LightCell]>>>; 4],
}

/// The cell column in a neighbour's grid that touches our shared edge, for
/// the edge coordinate `a`.
fn boundary_column(dir: Direction, a: usize) -> usize {
    match dir {
        Direction::North => 15 << 4 | a,
        Direction::South => a,
        Direction::West => a << 4 | 15,
        Direction::East => a << 4,
        Direction::Down | Direction::Up => unreachable!("boundaries are horizontal"),
    }
}

/// The highest heightmap value among the four orthogonally adjacent columns,
/// crossing into neighbour chunks at the rim.
fn neighbour_max_height(data: &ChunkData, edges: &HeightmapEdges, x: u8, z: u8) -> i32 {
    let west = if x > 0 {
        data.height(column_index(x - 1, z))
    } else {
        edges.west[usize::from(z)]
    };
    let east = if x < 15 {
        data.height(column_index(x + 1, z))
    } else {
        edges.east[usize::from(z)]
    };
    let north = if z > 0 {
        data.height(column_index(x, z - 1))
    } else {
        edges.north[usize::from(x)]
    };
    let south = if z < 15 {
        data.height(column_index(x, z + 1))
    } else {
        edges.south[usize::from(x)]
    };
    west.max(east).max(north).max(south)
}

impl Chunk {
    /// Reads the combined light of one voxel.
    ///
    /// Sky light is forced to 15 at or above the column's heightmap. One
    /// layer below the loaded range reads the bottom border; everything above
    /// the loaded range is full sky.
    #[must_use]
    pub fn light_at(&self, x: u8, y: i32, z: u8) -> LightCell {
        debug_assert!(x < 16 && z < 16);
        let section_height = y >> 4;
        if section_height == self.max_section() + 1 {
            return if self.can_skylight() {
                LightCell::FULL_SKY
            } else {
                LightCell::EMPTY
            };
        }
        let data = self.data.read();
        let column = column_index(x, z);
        let mut cell = if section_height == self.min_section() - 1 {
            data.bottom.get(column)
        } else {
            data.section(section_height)
                .map_or(LightCell::EMPTY, |section| {
                    section.light.get(block_index(x, y, z))
                })
        };
        if y >= data.height(column) {
            cell = cell.with_sky(MAX_LIGHT);
        }
        cell
    }

    /// Places a block state and incrementally updates occlusion, the
    /// heightmap, and light.
    ///
    /// # Panics
    /// Panics when the local coordinates or the section height are out of
    /// range; those are programmer errors, never clamped.
    pub fn set_block(&self, x: u8, y: i32, z: u8, state: BlockStateId) {
        assert!(x < 16 && z < 16, "local coordinates out of range: ({x}, {z})");
        let section_height = y >> 4;
        assert!(
            section_height >= self.min_section() && section_height <= self.max_section(),
            "section height {section_height} outside [{}, {}]",
            self.min_section(),
            self.max_section()
        );

        let snapshot = self.snapshot_neighbours();
        let mut events: SmallVec<[SectionLightUpdate; 8]> = SmallVec::new();
        {
            let mut data = self.data.write();
            if state.is_air() && data.section(section_height).is_none() {
                return;
            }
            let Some(section) = data.get_or_create_section(section_height) else {
                return;
            };
            let index = block_index(x, y, z);
            let previous = section.blocks.set(index, state);
            if previous == state {
                return;
            }

            if self.registry().is_fully_opaque(previous) != self.registry().is_fully_opaque(state)
            {
                let ChunkSection {
                    blocks, occlusion, ..
                } = section;
                if occlusion.recalculate(blocks, self.registry()) {
                    self.bump_occlusion_revision();
                }
            }

            if self.dimension().light {
                let column = column_index(x, z);
                let old_height = data.height(column);
                self.update_heightmap(&mut data, x, y, z, state);
                let new_height = data.height(column);
                let edges = snapshot.as_ref().map(|snapshot| &snapshot.edges);

                let mut band_rebuilt = false;
                if new_height > old_height {
                    // the column top rose: everything the new shadow covers
                    // is stale, reset and rebuild it
                    let low = if old_height == HEIGHT_OPEN {
                        self.min_section()
                    } else {
                        old_height >> 4
                    };
                    let high = new_height >> 4;
                    self.rebuild_light(&mut data, low, high, edges);
                    band_rebuilt = low.max(self.min_section()) <= section_height
                        && section_height <= high.min(self.max_section());
                } else if new_height < old_height && self.can_skylight() {
                    // the column top fell: pour sky light back down
                    if let Some(edges) = edges {
                        let mut queue = LightQueue::new();
                        self.start_skylight_flood(&mut data, &mut queue, x, z, edges);
                        self.run_queue(&mut data, &mut queue, true);
                    }
                }
                if !band_rebuilt {
                    self.rebuild_light(&mut data, section_height, section_height, edges);
                }
                if let Some(snapshot) = &snapshot {
                    let mut queue = LightQueue::new();
                    self.pull_neighbour_planes(&mut data, &mut queue, snapshot, false);
                    self.run_queue(&mut data, &mut queue, false);
                    if self.can_skylight() {
                        self.pull_neighbour_planes(&mut data, &mut queue, snapshot, true);
                        self.run_queue(&mut data, &mut queue, true);
                    }
                }
                events = self.drain_update_events(&mut data, Some(section_height));
            }
        }
        if snapshot.is_some() {
            self.emit(&events);
        }
    }

    /// Resets and recomputes all light of the chunk from its block data.
    pub fn recalculate_light(&self, fire_events: bool) {
        let snapshot = self.snapshot_neighbours();
        let events = {
            let mut data = self.data.write();
            self.rebuild_light(
                &mut data,
                self.min_section(),
                self.max_section(),
                snapshot.as_ref().map(|snapshot| &snapshot.edges),
            );
            self.drain_update_events(&mut data, None)
        };
        if fire_events && snapshot.is_some() {
            self.emit(&events);
        }
    }

    /// Zeroes all stored light without touching block data.
    pub fn reset_light(&self) {
        let mut data = self.data.write();
        let ChunkData {
            sections, bottom, ..
        } = &mut *data;
        for section in sections.iter_mut().flatten() {
            section.light.reset();
        }
        bottom.reset();
    }

    /// Re-seeds the flood fill from the neighbours' boundary light.
    ///
    /// Defers silently while the neighbour set is incomplete; callers that
    /// need eventual consistency re-invoke this once neighbours arrive.
    pub fn propagate_from_neighbours(&self, fire_events: bool) {
        let Some(snapshot) = self.snapshot_neighbours() else {
            return;
        };
        let events = {
            let mut data = self.data.write();
            let mut queue = LightQueue::new();
            for sky in [false, true] {
                if sky && !self.can_skylight() {
                    continue;
                }
                self.pull_neighbour_planes(&mut data, &mut queue, &snapshot, sky);
                for boundary in self.min_section()..=self.max_section() {
                    self.pull_vertical(&mut data, &mut queue, boundary, Direction::Down, sky);
                    self.pull_vertical(&mut data, &mut queue, boundary, Direction::Up, sky);
                }
                self.run_queue(&mut data, &mut queue, sky);
            }
            self.drain_update_events(&mut data, None)
        };
        if fire_events {
            self.emit(&events);
        }
    }

    /// Rescans every column's heightmap and re-floods skylight.
    ///
    /// Used on initial load; `set_block` keeps the heightmap current
    /// incrementally afterwards.
    pub fn recalculate_heightmap(&self) {
        if !self.can_skylight() {
            return;
        }
        let snapshot = self.snapshot_neighbours();
        let mut data = self.data.write();
        let top = self.max_section() * 16 + 15;
        for z in 0..16u8 {
            for x in 0..16u8 {
                self.check_heightmap_column(&mut data, x, top, z);
            }
        }
        if let Some(snapshot) = &snapshot {
            let mut queue = LightQueue::new();
            for z in 0..16u8 {
                for x in 0..16u8 {
                    self.start_skylight_flood(&mut data, &mut queue, x, z, &snapshot.edges);
                }
            }
            self.run_queue(&mut data, &mut queue, true);
        }
    }

    /// One-time initial light pass, run when the eighth neighbour arrives.
    /// Fires no notifications; the chunk is not live yet.
    pub(crate) fn on_neighbours_complete(&self) {
        log::debug!(
            "chunk {} is fully neighboured, running initial light pass",
            self.pos()
        );
        self.recalculate_light(false);
        self.propagate_from_neighbours(false);
    }

    // heightmap

    fn update_heightmap(&self, data: &mut ChunkData, x: u8, y: i32, z: u8, state: BlockStateId) {
        if !self.can_skylight() {
            return;
        }
        let column = column_index(x, z);
        let current = data.height(column);
        if current > y + 1 {
            // shadowed by a higher block, nothing changes
            return;
        }
        let props = self.registry().light(state);
        if props.passes_skylight_down() {
            self.check_heightmap_column(data, x, y, z);
        } else if !props.skylight_enters {
            data.heightmap[column] = y + 1;
        } else {
            data.heightmap[column] = y;
        }
    }

    /// Scans one column downward from `start_y` for the first voxel that
    /// does not fully pass skylight.
    fn check_heightmap_column(&self, data: &mut ChunkData, x: u8, start_y: i32, z: u8) {
        let column = column_index(x, z);
        let start_section = (start_y >> 4).min(self.max_section());
        let mut result = HEIGHT_OPEN;
        'sections: for section_height in (self.min_section()..=start_section).rev() {
            let Some(section) = data.section(section_height) else {
                continue;
            };
            if section.blocks.is_empty() {
                continue;
            }
            for sy in (0..16usize).rev() {
                let state = section.blocks.get(sy << 8 | column);
                if state.is_air() {
                    continue;
                }
                let props = self.registry().light(state);
                if props.passes_skylight_down() {
                    continue;
                }
                result = section_height * 16 + sy as i32;
                if !props.skylight_enters {
                    result += 1;
                }
                break 'sections;
            }
        }
        data.heightmap[column] = result;
    }

    // flood fill

    /// Offers `source_level` light travelling in `travel` to the voxel at
    /// the target coordinates, storing and queueing it when it beats the
    /// stored value. Coordinates outside the chunk are dropped; the pull
    /// pass re-derives them on the neighbour's side.
    #[allow(clippy::too_many_arguments)]
    fn try_raise(
        &self,
        data: &mut ChunkData,
        queue: &mut LightQueue<LightNode>,
        x: i32,
        y: i32,
        z: i32,
        source_level: u8,
        travel: Direction,
        sky: bool,
    ) {
        if source_level <= 1 {
            return;
        }
        if !(0..16).contains(&x) || !(0..16).contains(&z) {
            return;
        }
        let section_height = y >> 4;
        if section_height < self.min_section() {
            if travel == Direction::Down && section_height == self.min_section() - 1 {
                data.bottom
                    .raise(column_index(x as u8, z as u8), source_level - 1, sky);
            }
            return;
        }
        if section_height > self.max_section() {
            return;
        }
        let Some(section) = data.section_mut(section_height) else {
            return;
        };
        let index = block_index(x as u8, y, z as u8);
        let props = *self.registry().light(section.blocks.get(index));
        if sky && !props.skylight_enters {
            return;
        }
        if !props.propagates_light(travel) {
            return;
        }
        let cost = 1 + u8::from(sky && props.filters_skylight);
        if source_level <= cost {
            return;
        }
        let level = source_level - cost;
        if !section.light.raise(index, level, sky) {
            return;
        }
        queue.push(LightNode {
            x: x as u8,
            z: z as u8,
            y,
            level,
            from: Some(travel.opposite()),
        });
    }

    /// Drains the queue, spreading every entry into the up to five outward
    /// directions. Monotonic and strictly decreasing per step, so it always
    /// terminates.
    fn run_queue(&self, data: &mut ChunkData, queue: &mut LightQueue<LightNode>, sky: bool) {
        while let Some(node) = queue.pop() {
            for dir in Direction::ALL {
                if node.from == Some(dir) {
                    continue;
                }
                let offset = dir.offset();
                self.try_raise(
                    data,
                    queue,
                    i32::from(node.x) + offset.x,
                    node.y + offset.y,
                    i32::from(node.z) + offset.z,
                    node.level,
                    dir,
                    sky,
                );
            }
        }
    }

    /// Resets the sections in `[low, high]` and rebuilds their light from
    /// scratch: block emitters, open-sky columns, the rim spill flood, and
    /// pulls across the band's vertical seams.
    fn rebuild_light(
        &self,
        data: &mut ChunkData,
        low: i32,
        high: i32,
        edges: Option<&HeightmapEdges>,
    ) {
        let low = low.max(self.min_section());
        let high = high.min(self.max_section());
        if low > high {
            return;
        }
        log::trace!(
            "rebuilding light of chunk {} sections {low}..={high}",
            self.pos()
        );

        for section_height in low..=high {
            if let Some(section) = data.section_mut(section_height) {
                section.light.reset();
            }
        }
        if low == self.min_section() {
            data.bottom.reset();
        }

        let mut queue = LightQueue::new();

        for section_height in (low..=high).rev() {
            let Some(section) = data.section_mut(section_height) else {
                continue;
            };
            if section.blocks.is_empty() {
                continue;
            }
            let ChunkSection { blocks, light, .. } = section;
            let base_y = section_height * 16;
            for index in 0..BLOCKS_PER_SECTION {
                let emission = self.registry().light(blocks.get(index)).emission;
                if emission == 0 {
                    continue;
                }
                if light.raise(index, emission, false) {
                    queue.push(LightNode {
                        x: (index & 15) as u8,
                        z: ((index >> 4) & 15) as u8,
                        y: base_y + (index >> 8) as i32,
                        level: emission,
                        from: None,
                    });
                }
            }
        }
        self.pull_vertical(data, &mut queue, high, Direction::Down, false);
        self.pull_vertical(data, &mut queue, low, Direction::Up, false);
        self.run_queue(data, &mut queue, false);

        if self.can_skylight() {
            let heights = data.heightmap;
            for section_height in (low..=high).rev() {
                let Some(section) = data.section_mut(section_height) else {
                    continue;
                };
                let ChunkSection { blocks, light, .. } = section;
                let base_y = section_height * 16;
                for column in 0..COLUMNS_PER_CHUNK {
                    for sy in 0..16usize {
                        let y = base_y + sy as i32;
                        if y < heights[column] {
                            continue;
                        }
                        let index = sy << 8 | column;
                        if !self.registry().light(blocks.get(index)).skylight_enters {
                            continue;
                        }
                        if light.raise(index, MAX_LIGHT, true) {
                            queue.push(LightNode {
                                x: (column & 15) as u8,
                                z: (column >> 4) as u8,
                                y,
                                level: MAX_LIGHT,
                                from: None,
                            });
                        }
                    }
                }
            }
            if let Some(edges) = edges {
                for z in 0..16u8 {
                    for x in 0..16u8 {
                        self.start_skylight_flood(data, &mut queue, x, z, edges);
                    }
                }
            }
            self.pull_vertical(data, &mut queue, high, Direction::Down, true);
            self.pull_vertical(data, &mut queue, low, Direction::Up, true);
            self.run_queue(data, &mut queue, true);
        }
    }

    /// Starts the skylight flood for one column: full sky pours down from
    /// the highest facing neighbour column and spills over the rim into this
    /// one, ending in the bottom border when the column is open all the way.
    fn start_skylight_flood(
        &self,
        data: &mut ChunkData,
        queue: &mut LightQueue<LightNode>,
        x: u8,
        z: u8,
        edges: &HeightmapEdges,
    ) {
        let column = column_index(x, z);
        let max_height = data.height(column);
        let start = neighbour_max_height(data, edges, x, z);
        if max_height == HEIGHT_OPEN && start == HEIGHT_OPEN {
            // open sky everywhere, nothing to store
            return;
        }

        let start_section = start >> 4;
        if start != HEIGHT_OPEN && (start & 15) == 1 {
            // the spill reaches one voxel into the section below
            data.get_or_create_section(start_section - 1);
        }

        let max_height_section = max_height >> 4;
        let band_high = start_section.min(self.max_section());
        let band_low = (max_height_section + 1).max(self.min_section());
        if band_low <= band_high {
            for section_height in (band_low..=band_high).rev() {
                self.seed_sky_column(data, queue, x, z, section_height, 15, 0);
            }
        }
        if max_height_section < self.min_section() {
            data.bottom.raise(column, MAX_LIGHT, true);
        } else {
            data.get_or_create_section(max_height_section);
            let top_sy = if start_section == max_height_section {
                (start & 15) as usize
            } else {
                15
            };
            let bottom_sy = (max_height & 15) as usize;
            if top_sy >= bottom_sy {
                self.seed_sky_column(data, queue, x, z, max_height_section, top_sy, bottom_sy);
            }
        }
    }

    /// Seeds full sky light into `[bottom_sy, top_sy]` of one column of one
    /// section, top down.
    #[allow(clippy::too_many_arguments)]
    fn seed_sky_column(
        &self,
        data: &mut ChunkData,
        queue: &mut LightQueue<LightNode>,
        x: u8,
        z: u8,
        section_height: i32,
        top_sy: usize,
        bottom_sy: usize,
    ) {
        let Some(section) = data.section_mut(section_height) else {
            return;
        };
        let ChunkSection { blocks, light, .. } = section;
        let base_y = section_height * 16;
        let column = column_index(x, z);
        for sy in (bottom_sy..=top_sy).rev() {
            let index = sy << 8 | column;
            if !self.registry().light(blocks.get(index)).skylight_enters {
                continue;
            }
            if light.raise(index, MAX_LIGHT, true) {
                queue.push(LightNode {
                    x,
                    z,
                    y: base_y + sy as i32,
                    level: MAX_LIGHT,
                    from: None,
                });
            }
        }
    }

    /// Pulls one channel across a vertical seam: light from the section on
    /// the far side of `boundary` (or the bottom border) is offered to the
    /// facing cells.
    fn pull_vertical(
        &self,
        data: &mut ChunkData,
        queue: &mut LightQueue<LightNode>,
        boundary: i32,
        travel: Direction,
        sky: bool,
    ) {
        let (source_height, source_sy, target_y) = match travel {
            Direction::Down => (boundary + 1, 0usize, boundary * 16 + 15),
            Direction::Up => (boundary - 1, 15usize, boundary * 16),
            _ => return,
        };
        if source_height > self.max_section() {
            // the virtual top layer is covered by the heightmap seeding
            return;
        }
        let mut cells = [LightCell::EMPTY; COLUMNS_PER_CHUNK];
        if source_height < self.min_section() {
            if source_height < self.min_section() - 1 {
                return;
            }
            for (column, cell) in cells.iter_mut().enumerate() {
                *cell = data.bottom.get(column);
            }
        } else {
            let Some(source) = data.section(source_height) else {
                return;
            };
            for (column, cell) in cells.iter_mut().enumerate() {
                *cell = source.light.get(source_sy << 8 | column);
            }
        }
        for (column, cell) in cells.iter().enumerate() {
            let level = if sky { cell.sky() } else { cell.block() };
            self.try_raise(
                data,
                queue,
                (column & 15) as i32,
                target_y,
                (column >> 4) as i32,
                level,
                travel,
                sky,
            );
        }
    }

    // neighbour snapshots

    fn snapshot_neighbours(&self) -> Option<NeighbourSnapshot> {
        let neighbours = self.neighbours.lock().get()?;
        let section_count = (self.max_section() - self.min_section() + 1) as usize;
        let mut edges = HeightmapEdges::new();
        let mut planes: [Vec<Option<Box<[LightCell]>>>; 4] =
            std::array::from_fn(|_| (0..section_count).map(|_| None).collect());

        for (plane_index, dir) in Direction::HORIZONTAL.into_iter().enumerate() {
            let neighbour = &neighbours[NeighbourSet::horizontal_slot(dir)];
            let data = neighbour.data.read();
            let heights = edges.row_mut(dir);
            for (a, height) in heights.iter_mut().enumerate() {
                *height = data.height(boundary_column(dir, a));
            }
            for (section_index, slot) in planes[plane_index].iter_mut().enumerate() {
                let Some(section) = data.section(self.min_section() + section_index as i32)
                else {
                    continue;
                };
                let mut plane = vec![LightCell::EMPTY; COLUMNS_PER_CHUNK].into_boxed_slice();
                for sy in 0..16usize {
                    for a in 0..16usize {
                        plane[sy << 4 | a] = section.light.get(sy << 8 | boundary_column(dir, a));
                    }
                }
                *slot = Some(plane);
            }
        }
        Some(NeighbourSnapshot { edges, planes })
    }

    /// Offers one channel of the snapshotted neighbour boundary planes to
    /// this chunk's edge cells. Open-sky neighbour columns count as full sky
    /// even where the neighbour stores nothing.
    fn pull_neighbour_planes(
        &self,
        data: &mut ChunkData,
        queue: &mut LightQueue<LightNode>,
        snapshot: &NeighbourSnapshot,
        sky: bool,
    ) {
        for (plane_index, dir) in Direction::HORIZONTAL.into_iter().enumerate() {
            let travel = dir.opposite();
            let heights = snapshot.edges.row(dir);
            for (section_index, plane) in snapshot.planes[plane_index].iter().enumerate() {
                let Some(plane) = plane else { continue };
                let section_height = self.min_section() + section_index as i32;
                if data.section(section_height).is_none() {
                    continue;
                }
                let base_y = section_height * 16;
                for sy in 0..16usize {
                    let y = base_y + sy as i32;
                    for a in 0..16usize {
                        let cell = plane[sy << 4 | a];
                        let level = if sky {
                            if y >= heights[a] { MAX_LIGHT } else { cell.sky() }
                        } else {
                            cell.block()
                        };
                        if level <= 1 {
                            continue;
                        }
                        let (x, z) = match dir {
                            Direction::North => (a as i32, 0),
                            Direction::South => (a as i32, 15),
                            Direction::West => (0, a as i32),
                            Direction::East => (15, a as i32),
                            Direction::Down | Direction::Up => continue,
                        };
                        self.try_raise(data, queue, x, y, z, level, travel, sky);
                    }
                }
            }
        }
    }

    // notifications

    /// Clears every set section flag, producing at most one event per
    /// section per pass.
    fn drain_update_events(
        &self,
        data: &mut ChunkData,
        origin: Option<i32>,
    ) -> SmallVec<[SectionLightUpdate; 8]> {
        let mut events = SmallVec::new();
        let ChunkData {
            sections,
            min_section,
            ..
        } = &mut *data;
        for (index, section) in sections.iter_mut().enumerate() {
            let Some(section) = section else { continue };
            if !section.light.take_update() {
                continue;
            }
            let section_height = *min_section + index as i32;
            events.push(SectionLightUpdate {
                chunk: self.pos(),
                section_height,
                own_chunk: origin == Some(section_height),
            });
        }
        events
    }

    fn emit(&self, events: &[SectionLightUpdate]) {
        for event in events {
            self.events().section_light_changed(*event);
        }
    }
}
