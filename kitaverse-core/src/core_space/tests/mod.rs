/*
    Tests for the core_space registry

    Test suite covering:
    - Entry/exit scenarios against the seed Spaces
    - Cumulative vs transfer entry policies
    - Occupancy invariants under random operation sequences
    - Concurrent entry through the shared service
*/
